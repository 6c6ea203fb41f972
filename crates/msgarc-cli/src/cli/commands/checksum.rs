//! `msgarc checksum <path>` – SHA-256 of an archived file.

use anyhow::Result;
use msgarc_core::checksum;
use std::path::Path;

/// Print the SHA-256 of `path`; with `expected`, fail on mismatch.
pub fn run_checksum(path: &Path, expected: Option<&str>) -> Result<()> {
    let digest = checksum::sha256_path(path)?;
    println!("{}  {}", digest, path.display());
    if let Some(expected) = expected {
        if !checksum::verify_path(path, expected)? {
            anyhow::bail!("checksum mismatch for {}: expected {}", path.display(), expected);
        }
    }
    Ok(())
}
