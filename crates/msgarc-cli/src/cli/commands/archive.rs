//! `msgarc archive` – write a payload under its resolved filename.

use anyhow::{Context, Result};
use msgarc_core::audit::{AuditLog, AuditSink, AuditStatus, TracingAudit};
use msgarc_core::config::ArchiveConfig;
use msgarc_core::message::Message;
use msgarc_core::Archiver;
use std::path::Path;

/// Fans entries out to the tracing log and the in-memory trail.
struct Tee<'a>(&'a dyn AuditSink, &'a dyn AuditSink);

impl AuditSink for Tee<'_> {
    fn record(&self, message_id: &str, status: AuditStatus, text: &str) {
        self.0.record(message_id, status, text);
        self.1.record(message_id, status, text);
    }
}

pub fn run_archive(cfg: ArchiveConfig, message: &Path, payload: &Path, print_audit: bool) -> Result<()> {
    let msg = Message::load(message)?;
    let bytes = std::fs::read(payload).with_context(|| format!("read payload {}", payload.display()))?;

    let trail = AuditLog::new();
    let sink = Tee(&TracingAudit, &trail);
    let result = Archiver::new(cfg)
        .with_audit(&sink)
        .archive(&msg.context(), &bytes);

    if print_audit {
        for entry in trail.entries() {
            println!("[{}] {}", entry.status, entry.text);
        }
    }

    let receipt = result.with_context(|| format!("archive message {}", msg.id))?;
    println!(
        "{}  {} bytes  sha256 {}",
        receipt.path.display(),
        receipt.bytes,
        receipt.sha256
    );
    Ok(())
}
