//! Per-message audit trail.
//!
//! The sink is optional everywhere it is accepted; archiving behaves the same
//! without one. `tracing` events are emitted regardless.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Success,
    Warning,
    Error,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditStatus::Success => write!(f, "SUCCESS"),
            AuditStatus::Warning => write!(f, "WARNING"),
            AuditStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Receives audit entries for the message currently being archived.
pub trait AuditSink {
    fn record(&self, message_id: &str, status: AuditStatus, text: &str);
}

/// Single recorded entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub message_id: String,
    pub status: AuditStatus,
    pub text: String,
}

/// Collects entries in memory (CLI `--audit`, tests).
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for AuditLog {
    fn record(&self, message_id: &str, status: AuditStatus, text: &str) {
        let entry = AuditEntry {
            message_id: message_id.to_string(),
            status,
            text: text.to_string(),
        };
        match self.entries.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

/// Forwards entries to `tracing` under the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, message_id: &str, status: AuditStatus, text: &str) {
        match status {
            AuditStatus::Success => tracing::info!(target: "audit", message_id, "{}", text),
            AuditStatus::Warning => tracing::warn!(target: "audit", message_id, "{}", text),
            AuditStatus::Error => tracing::error!(target: "audit", message_id, "{}", text),
        }
    }
}

/// Records into `sink` when present.
pub(crate) fn record(
    sink: Option<&dyn AuditSink>,
    message_id: &str,
    status: AuditStatus,
    text: impl AsRef<str>,
) {
    if let Some(sink) = sink {
        sink.record(message_id, status, text.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_order() {
        let log = AuditLog::new();
        log.record("m1", AuditStatus::Success, "first");
        log.record("m1", AuditStatus::Warning, "second");
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "first");
        assert_eq!(entries[1].status, AuditStatus::Warning);
    }

    #[test]
    fn record_without_sink_is_noop() {
        record(None, "m1", AuditStatus::Success, "ignored");
    }

    #[test]
    fn status_display() {
        assert_eq!(AuditStatus::Error.to_string(), "ERROR");
    }
}
