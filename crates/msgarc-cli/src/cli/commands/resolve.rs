//! `msgarc resolve` – print the filename a message would be archived under.

use anyhow::{Context, Result};
use msgarc_core::config::ArchiveConfig;
use msgarc_core::message::Message;
use msgarc_core::template::Resolver;
use msgarc_core::unique;
use std::path::Path;

pub fn run_resolve(
    cfg: &ArchiveConfig,
    template: Option<&str>,
    message: &Path,
    base_dir: Option<&Path>,
) -> Result<()> {
    let msg = Message::load(message)?;
    let template = template
        .map(str::to_string)
        .unwrap_or_else(|| cfg.file_template());

    let name = Resolver::new()
        .with_policy(cfg.missing_property)
        .resolve(&template, &msg.context())
        .with_context(|| format!("resolve template {template:?} for message {}", msg.id))?;
    println!("{name}");

    if let Some(dir) = base_dir {
        let path = unique::unique_path_with_limit(dir, &name, cfg.max_unique_attempts)?;
        println!("{}", path.display());
    }
    Ok(())
}
