//! CLI for the msgarc message archiver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use msgarc_core::config::{self, ArchiveConfig};
use msgarc_core::template::MissingPropertyPolicy;
use std::path::PathBuf;

use commands::{run_archive, run_checksum, run_resolve};

/// Top-level CLI for msgarc.
#[derive(Debug, Parser)]
#[command(name = "msgarc")]
#[command(about = "msgarc: archive message payloads under templated filenames", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/msgarc/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a filename template against a message envelope and print it.
    Resolve {
        /// Template to resolve. Defaults to the configured template plus extension.
        template: Option<String>,
        /// Message envelope (TOML, or JSON with a .json extension).
        #[arg(long, value_name = "FILE")]
        message: PathBuf,
        /// Also print the unique path this name would get under DIR.
        #[arg(long, value_name = "DIR")]
        base_dir: Option<PathBuf>,
        /// Fail on unset dynamic properties instead of substituting "".
        #[arg(long)]
        strict: bool,
    },

    /// Write a payload to the archive under its resolved, unique filename.
    Archive {
        /// Message envelope (TOML, or JSON with a .json extension).
        #[arg(long, value_name = "FILE")]
        message: PathBuf,
        /// File whose bytes are archived.
        #[arg(long, value_name = "FILE")]
        payload: PathBuf,
        /// Override the configured archive directory.
        #[arg(long, value_name = "DIR")]
        base_dir: Option<PathBuf>,
        /// Override the configured filename template (extension still applies).
        #[arg(long)]
        template: Option<String>,
        /// Fail on unset dynamic properties instead of substituting "".
        #[arg(long)]
        strict: bool,
        /// Print the audit trail for this message.
        #[arg(long)]
        audit: bool,
    },

    /// Compute SHA-256 of an archived file, optionally checking it.
    Checksum {
        /// Path to the file.
        path: PathBuf,
        /// Expected digest (hex); exit with an error on mismatch.
        #[arg(long)]
        expect: Option<String>,
    },
}

/// Apply the `--strict` flag on top of the loaded policy.
fn policy(strict: bool, cfg: &ArchiveConfig) -> MissingPropertyPolicy {
    if strict {
        MissingPropertyPolicy::Fail
    } else {
        cfg.missing_property
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve {
                template,
                message,
                base_dir,
                strict,
            } => {
                let cfg = ArchiveConfig {
                    missing_property: policy(strict, &cfg),
                    ..cfg
                };
                run_resolve(&cfg, template.as_deref(), &message, base_dir.as_deref())?;
            }
            CliCommand::Archive {
                message,
                payload,
                base_dir,
                template,
                strict,
                audit,
            } => {
                let mut cfg = ArchiveConfig {
                    missing_property: policy(strict, &cfg),
                    ..cfg
                };
                if let Some(dir) = base_dir {
                    cfg.archive_base_dir = dir;
                }
                if let Some(t) = template {
                    cfg.archive_file = t;
                }
                run_archive(cfg, &message, &payload, audit)?;
            }
            CliCommand::Checksum { path, expect } => run_checksum(&path, expect.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
