//! Writer for a freshly claimed archive file.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ArchiveError, Result};

/// What ended up on disk for one archived payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReceipt {
    pub path: PathBuf,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the payload.
    pub sha256: String,
}

/// Owns the archive file until `finish`. Dropping without `finish` leaves the
/// file in place; call `discard` to remove a partial write.
pub struct ArchiveWriter {
    file: File,
    path: PathBuf,
    hasher: Sha256,
    written: u64,
}

impl ArchiveWriter {
    pub(crate) fn new(file: File, path: PathBuf) -> Self {
        Self {
            file,
            path,
            hasher: Sha256::new(),
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `data` to the archive file.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .map_err(|e| ArchiveError::io(format!("failed to write {}", self.path.display()), e))?;
        self.hasher.update(data);
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flush and sync to disk, closing the file. On failure the file is removed.
    pub fn finish(mut self) -> Result<ArchiveReceipt> {
        if let Err(e) = self.file.flush().and_then(|()| self.file.sync_all()) {
            let context = format!("failed to sync {}", self.path.display());
            self.discard();
            return Err(ArchiveError::io(context, e));
        }
        Ok(ArchiveReceipt {
            path: self.path,
            bytes: self.written,
            sha256: hex::encode(self.hasher.finalize()),
        })
    }

    /// Close and remove the file.
    pub fn discard(self) {
        let path = self.path;
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial archive file");
        }
    }
}
