//! Archive file lifecycle: claim a unique name, write the payload, sync.
//!
//! Names are claimed with exclusive create, so the existence check and the
//! write cannot interleave with another archiver. A failed write or sync removes the
//! partial file.

mod writer;

pub use writer::{ArchiveReceipt, ArchiveWriter};

use std::path::Path;

use crate::error::{ArchiveError, Result};
use crate::unique;

/// Create `base_dir` (and parents) when it is not a directory yet.
pub fn ensure_dir(base_dir: &Path) -> Result<()> {
    if base_dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(base_dir).map_err(|e| {
        ArchiveError::io(
            format!("failed to create archive directory: {}", base_dir.display()),
            e,
        )
    })?;
    tracing::info!(dir = %base_dir.display(), "created archive directory");
    Ok(())
}

/// Claim a unique file for `file_name` under `base_dir`.
pub fn create_unique(base_dir: &Path, file_name: &str, limit: u32) -> Result<ArchiveWriter> {
    let (file, path) = unique::claim_unique(base_dir, file_name, limit)?;
    Ok(ArchiveWriter::new(file, path))
}

/// Write `payload` to a unique file under `base_dir`.
pub fn store(base_dir: &Path, file_name: &str, limit: u32, payload: &[u8]) -> Result<ArchiveReceipt> {
    let writer = create_unique(base_dir, file_name, limit)?;
    write_and_finish(writer, payload)
}

/// Write the whole payload and sync; any failure leaves no file behind.
fn write_and_finish(mut writer: ArchiveWriter, payload: &[u8]) -> Result<ArchiveReceipt> {
    if let Err(e) = writer.write(payload) {
        writer.discard();
        return Err(e);
    }
    writer.finish()
}
