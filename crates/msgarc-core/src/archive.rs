//! Archive workflow: resolve the filename, claim a unique path, write the payload.

use std::fmt::Display;
use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone};

use crate::audit::{self, AuditSink, AuditStatus};
use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::storage::{self, ArchiveReceipt};
use crate::template::{ResolutionContext, Resolver};
use crate::unique;

/// Archives message payloads according to an [`ArchiveConfig`].
pub struct Archiver<'a> {
    config: ArchiveConfig,
    audit: Option<&'a dyn AuditSink>,
}

impl<'a> Archiver<'a> {
    pub fn new(config: ArchiveConfig) -> Self {
        Self {
            config,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: &'a dyn AuditSink) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    fn resolver(&self) -> Resolver<'a> {
        Resolver::new()
            .with_policy(self.config.missing_property)
            .with_audit(self.audit)
    }

    /// Resolved filename (template plus extension), without touching the disk.
    pub fn resolve_name(&self, ctx: &ResolutionContext<'_>) -> Result<String> {
        self.resolver().resolve(&self.config.file_template(), ctx)
    }

    /// Path the payload would currently be written to. Not reserved.
    pub fn preview_path(&self, ctx: &ResolutionContext<'_>) -> Result<PathBuf> {
        let name = self.resolve_name(ctx)?;
        unique::unique_path_with_limit(
            &self.config.archive_base_dir,
            &name,
            self.config.max_unique_attempts,
        )
    }

    /// Archive `payload` for the message described by `ctx`.
    pub fn archive(&self, ctx: &ResolutionContext<'_>, payload: &[u8]) -> Result<ArchiveReceipt> {
        self.archive_at(ctx, payload, &Local::now())
    }

    /// As [`Archiver::archive`], resolving date placeholders against `now`.
    pub fn archive_at<Tz>(
        &self,
        ctx: &ResolutionContext<'_>,
        payload: &[u8],
        now: &DateTime<Tz>,
    ) -> Result<ArchiveReceipt>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        audit::record(
            self.audit,
            ctx.message_id,
            AuditStatus::Success,
            format!("msgarc archiver {}", env!("CARGO_PKG_VERSION")),
        );

        let result = self.write(ctx, payload, now);
        match &result {
            Ok(receipt) => {
                tracing::info!(
                    message_id = ctx.message_id,
                    path = %receipt.path.display(),
                    bytes = receipt.bytes,
                    "payload archived"
                );
                audit::record(
                    self.audit,
                    ctx.message_id,
                    AuditStatus::Success,
                    format!("payload written to {}", receipt.path.display()),
                );
            }
            Err(e) => {
                tracing::warn!(message_id = ctx.message_id, error = %e, "archiving failed");
                audit::record(
                    self.audit,
                    ctx.message_id,
                    AuditStatus::Error,
                    format!("archiving failed: {e}"),
                );
            }
        }
        result
    }

    fn write<Tz>(
        &self,
        ctx: &ResolutionContext<'_>,
        payload: &[u8],
        now: &DateTime<Tz>,
    ) -> Result<ArchiveReceipt>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let base_dir = &self.config.archive_base_dir;
        storage::ensure_dir(base_dir)?;
        let name = self
            .resolver()
            .resolve_at(&self.config.file_template(), ctx, now)?;
        storage::store(base_dir, &name, self.config.max_unique_attempts, payload)
    }
}
