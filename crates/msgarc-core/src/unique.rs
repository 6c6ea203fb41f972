//! Collision-free archive paths.
//!
//! `name`, then `name.1`, `name.2`, … up to a fixed ceiling. The check-only
//! [`unique_path`] can race with other writers; [`claim_unique`] opens each
//! candidate with exclusive create instead, so two archivers never end up
//! sharing one file.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{ArchiveError, Result};

/// Maximum disambiguation index tried before giving up.
pub const MAX_UNIQUE_ATTEMPTS: u32 = 1000;

/// Rejects names that would leave the archive directory once joined to it:
/// absolute paths, drive prefixes and `..` components.
pub fn check_file_name(file_name: &str) -> Result<()> {
    let escapes = Path::new(file_name)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ArchiveError::malformed(format!(
            "resolved filename '{file_name}' leaves the archive directory"
        )));
    }
    Ok(())
}

/// Candidate for `index` (0 = no suffix). `file_name` must have passed
/// [`check_file_name`].
fn candidate_path(base_dir: &Path, file_name: &str, index: u32) -> PathBuf {
    if index == 0 {
        base_dir.join(file_name)
    } else {
        base_dir.join(format!("{file_name}.{index}"))
    }
}

/// First candidate under `base_dir` that does not exist yet.
pub fn unique_path(base_dir: &Path, file_name: &str) -> Result<PathBuf> {
    unique_path_with_limit(base_dir, file_name, MAX_UNIQUE_ATTEMPTS)
}

/// As [`unique_path`], with an explicit ceiling for the suffix index.
pub fn unique_path_with_limit(base_dir: &Path, file_name: &str, limit: u32) -> Result<PathBuf> {
    check_file_name(file_name)?;
    for index in 0..=limit {
        let candidate = candidate_path(base_dir, file_name, index);
        if !candidate.exists() {
            if index > 0 {
                tracing::debug!(path = %candidate.display(), index, "archive name taken, using suffix");
            }
            return Ok(candidate);
        }
    }
    Err(ArchiveError::NoUniqueNameAvailable {
        base: base_dir.join(file_name),
        attempts: limit,
    })
}

/// Creates the first free candidate exclusively and returns it opened for writing.
pub fn claim_unique(base_dir: &Path, file_name: &str, limit: u32) -> Result<(File, PathBuf)> {
    check_file_name(file_name)?;
    for index in 0..=limit {
        let candidate = candidate_path(base_dir, file_name, index);
        match File::options().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((file, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(ArchiveError::io(
                    format!("failed to create archive file: {}", candidate.display()),
                    e,
                ))
            }
        }
    }
    Err(ArchiveError::NoUniqueNameAvailable {
        base: base_dir.join(file_name),
        attempts: limit,
    })
}
