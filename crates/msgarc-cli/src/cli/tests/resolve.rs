//! Tests for resolve and checksum subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_resolve_with_template() {
    match parse(&["msgarc", "resolve", "%id-{HH}", "--message", "m.toml"]) {
        CliCommand::Resolve {
            template,
            message,
            base_dir,
            strict,
        } => {
            assert_eq!(template.as_deref(), Some("%id-{HH}"));
            assert_eq!(message, Path::new("m.toml"));
            assert!(base_dir.is_none());
            assert!(!strict);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_defaults_to_config_template() {
    match parse(&[
        "msgarc",
        "resolve",
        "--message",
        "m.json",
        "--base-dir",
        "/tmp/arc",
        "--strict",
    ]) {
        CliCommand::Resolve {
            template,
            base_dir,
            strict,
            ..
        } => {
            assert!(template.is_none());
            assert_eq!(base_dir.as_deref(), Some(Path::new("/tmp/arc")));
            assert!(strict);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_requires_message() {
    assert!(Cli::try_parse_from(["msgarc", "resolve", "%id"]).is_err());
}

#[test]
fn cli_parse_checksum() {
    match parse(&["msgarc", "checksum", "/arc/a.arc", "--expect", "abc"]) {
        CliCommand::Checksum { path, expect } => {
            assert_eq!(path, Path::new("/arc/a.arc"));
            assert_eq!(expect.as_deref(), Some("abc"));
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_global_config() {
    let cli = Cli::try_parse_from(["msgarc", "checksum", "x", "--config", "/etc/msgarc.toml"]).unwrap();
    assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/msgarc.toml")));
}
