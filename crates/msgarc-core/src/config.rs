use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::template::MissingPropertyPolicy;
use crate::unique::MAX_UNIQUE_ATTEMPTS;

fn default_extension() -> String {
    "arc".to_string()
}

fn default_max_unique_attempts() -> u32 {
    MAX_UNIQUE_ATTEMPTS
}

/// Global configuration loaded from `~/.config/msgarc/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Directory archived payloads are written to. Created on demand.
    pub archive_base_dir: PathBuf,
    /// Filename template, e.g. `"%fs-%id-{yyyyMMdd}"`.
    pub archive_file: String,
    /// Appended as `.<extension>` before resolution; empty disables it.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Highest `.N` suffix tried when the resolved name is taken.
    #[serde(default = "default_max_unique_attempts")]
    pub max_unique_attempts: u32,
    /// `"empty"` (default) or `"fail"` for unset dynamic properties.
    #[serde(default)]
    pub missing_property: MissingPropertyPolicy,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            archive_base_dir: PathBuf::from("archive"),
            archive_file: "%fs-%id-%TS".to_string(),
            extension: default_extension(),
            max_unique_attempts: MAX_UNIQUE_ATTEMPTS,
            missing_property: MissingPropertyPolicy::Empty,
        }
    }
}

impl ArchiveConfig {
    /// The template actually resolved: `archive_file` plus the extension.
    pub fn file_template(&self) -> String {
        if self.extension.is_empty() {
            self.archive_file.clone()
        } else {
            format!("{}.{}", self.archive_file, self.extension)
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("msgarc")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ArchiveConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ArchiveConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<ArchiveConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ArchiveConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
