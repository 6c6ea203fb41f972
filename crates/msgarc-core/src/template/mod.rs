//! Archive filename templates.
//!
//! A template mixes three placeholder classes, resolved in this order:
//!
//! 1. fixed tokens `%id %fp %tp %fs %ts` and the timestamp `%TS`
//! 2. dynamic properties `[namespace/name]`
//! 3. date formats `{pattern}`
//!
//! Each class is fully consumed before the next. Text produced by the dynamic
//! and date passes is literal: it is never scanned for further placeholders.

mod date_format;
mod extract;
mod tokens;

pub use date_format::{format_date, PRIMARY_TIMESTAMP_PATTERN};
pub use extract::{extract, find_enclosed, Enclosed};

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::audit::{self, AuditSink, AuditStatus};
use crate::error::{ArchiveError, Result};
use crate::property::PropertyLookup;
use tokens::TokenValues;

/// Message values a template is resolved against.
#[derive(Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub message_id: &'a str,
    pub from_party: &'a str,
    pub to_party: &'a str,
    pub from_service: &'a str,
    pub to_service: &'a str,
    pub properties: &'a dyn PropertyLookup,
}

/// What to do when a `[namespace/name]` property is not set on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPropertyPolicy {
    /// Substitute an empty string.
    #[default]
    Empty,
    /// Fail with `UnresolvedReference`.
    Fail,
}

/// Parsed `[namespace/name]` reference. The last `/` separates the two, so
/// namespaces may themselves contain slashes (`http://sap.com/file`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicRef<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
}

impl<'a> DynamicRef<'a> {
    pub fn parse(reference: &'a str) -> Result<Self> {
        let slash = reference.rfind('/').ok_or_else(|| {
            ArchiveError::malformed(format!(
                "no '/' found in dynamic reference '[{reference}]'"
            ))
        })?;
        Ok(DynamicRef {
            namespace: &reference[..slash],
            name: &reference[slash + 1..],
        })
    }
}

/// Piece of a partially resolved filename.
enum Segment {
    /// Template text, still open to later passes.
    Template(String),
    /// Resolved value, emitted as is.
    Literal(String),
}

/// Filename template resolver.
#[derive(Clone, Copy, Default)]
pub struct Resolver<'a> {
    policy: MissingPropertyPolicy,
    audit: Option<&'a dyn AuditSink>,
}

impl<'a> Resolver<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: MissingPropertyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_audit(mut self, audit: Option<&'a dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Resolves `template` against the current local time.
    pub fn resolve(&self, template: &str, ctx: &ResolutionContext<'_>) -> Result<String> {
        self.resolve_at(template, ctx, &Local::now())
    }

    /// Resolves `template` using `now` for both `%TS` and every `{pattern}`.
    pub fn resolve_at<Tz>(
        &self,
        template: &str,
        ctx: &ResolutionContext<'_>,
        now: &DateTime<Tz>,
    ) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let timestamp = format_date(PRIMARY_TIMESTAMP_PATTERN, now)?;
        let values = TokenValues {
            message_id: ctx.message_id,
            from_party: ctx.from_party,
            to_party: ctx.to_party,
            from_service: ctx.from_service,
            to_service: ctx.to_service,
            timestamp: &timestamp,
        };
        let with_tokens = tokens::substitute(template, &values);
        let segments = self.resolve_dynamic(&with_tokens, ctx)?;
        let resolved = self.resolve_dates(segments, ctx.message_id, now)?;

        tracing::debug!(template, resolved = %resolved, "resolved archive filename");
        Ok(resolved)
    }

    fn resolve_dynamic(&self, text: &str, ctx: &ResolutionContext<'_>) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut rest = text;

        while let Some(found) = find_enclosed(rest, '[', ']')? {
            let reference = DynamicRef::parse(found.inner)?;
            let value = self.lookup(&reference, ctx)?;
            segments.push(Segment::Template(rest[..found.span.start].to_string()));
            segments.push(Segment::Literal(value));
            rest = &rest[found.span.end..];
        }
        segments.push(Segment::Template(rest.to_string()));
        Ok(segments)
    }

    fn lookup(&self, reference: &DynamicRef<'_>, ctx: &ResolutionContext<'_>) -> Result<String> {
        let DynamicRef { namespace, name } = *reference;
        audit::record(
            self.audit,
            ctx.message_id,
            AuditStatus::Success,
            format!("found dynamic property {name}, namespace {namespace}"),
        );

        match ctx.properties.property(namespace, name) {
            Some(value) => {
                tracing::debug!(namespace, name, value = %value, "dynamic property resolved");
                audit::record(
                    self.audit,
                    ctx.message_id,
                    AuditStatus::Success,
                    format!("dynamic property has value [{value}]"),
                );
                Ok(value)
            }
            None if self.policy == MissingPropertyPolicy::Fail => {
                audit::record(
                    self.audit,
                    ctx.message_id,
                    AuditStatus::Error,
                    format!("dynamic property {name} is not set"),
                );
                Err(ArchiveError::UnresolvedReference {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
            }
            None => {
                tracing::debug!(namespace, name, "dynamic property not set, substituting empty");
                audit::record(
                    self.audit,
                    ctx.message_id,
                    AuditStatus::Success,
                    "dynamic property has value []",
                );
                Ok(String::new())
            }
        }
    }

    fn resolve_dates<Tz>(
        &self,
        segments: Vec<Segment>,
        message_id: &str,
        now: &DateTime<Tz>,
    ) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut out = String::new();
        for segment in segments {
            let text = match segment {
                Segment::Literal(value) => {
                    out.push_str(&value);
                    continue;
                }
                Segment::Template(text) => text,
            };

            let mut rest = text.as_str();
            while let Some(found) = find_enclosed(rest, '{', '}')? {
                audit::record(
                    self.audit,
                    message_id,
                    AuditStatus::Success,
                    format!("found date format {}", found.inner),
                );
                out.push_str(&rest[..found.span.start]);
                out.push_str(&format_date(found.inner, now)?);
                rest = &rest[found.span.end..];
            }
            out.push_str(rest);
        }
        Ok(out)
    }
}

/// Resolves `template` with the default policy and no audit sink.
pub fn resolve(template: &str, ctx: &ResolutionContext<'_>) -> Result<String> {
    Resolver::new().resolve(template, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::property::MessageProperties;
    use chrono::{Datelike, NaiveDate, Utc};

    const FILE_NS: &str = "http://sap.com/file";

    fn context(props: &MessageProperties) -> ResolutionContext<'_> {
        ResolutionContext {
            message_id: "asf34afasaffas3442",
            from_party: "testPartyFrom",
            to_party: "testPartyTo",
            from_service: "testServiceFrom",
            to_service: "testServiceTo",
            properties: props,
        }
    }

    fn instant() -> DateTime<Utc> {
        let naive = NaiveDate::from_ymd_opt(2023, 11, 2)
            .unwrap()
            .and_hms_milli_opt(8, 30, 15, 7)
            .unwrap();
        Utc.from_utc_datetime(&naive)
    }

    #[test]
    fn fixed_tokens() {
        let props = MessageProperties::new();
        let ctx = ResolutionContext {
            message_id: "X",
            from_party: "Y",
            ..context(&props)
        };
        assert_eq!(resolve("%id-%fp", &ctx).unwrap(), "X-Y");
    }

    #[test]
    fn dynamic_property() {
        let props = MessageProperties::new().with(FILE_NS, "FileName", "invoice");
        assert_eq!(
            resolve("start-[http://sap.com/file/FileName]-end", &context(&props)).unwrap(),
            "start-invoice-end"
        );
    }

    #[test]
    fn dynamic_property_whitespace_inside_brackets() {
        let props = MessageProperties::new().with("ns", "a", "v");
        assert_eq!(resolve("x[ ns/a ]y", &context(&props)).unwrap(), "xvy");
    }

    #[test]
    fn missing_property_is_empty_by_default() {
        let props = MessageProperties::new();
        assert_eq!(resolve("[ns/missing]", &context(&props)).unwrap(), "");
    }

    #[test]
    fn missing_property_fails_under_strict_policy() {
        let props = MessageProperties::new();
        let err = Resolver::new()
            .with_policy(MissingPropertyPolicy::Fail)
            .resolve("a-[ns/missing]", &context(&props))
            .unwrap_err();
        match err {
            ArchiveError::UnresolvedReference { namespace, name } => {
                assert_eq!(namespace, "ns");
                assert_eq!(name, "missing");
            }
            other => panic!("expected UnresolvedReference, got {other:?}"),
        }
    }

    #[test]
    fn reference_without_slash_is_malformed() {
        let props = MessageProperties::new();
        let err = resolve("[noslash]", &context(&props)).unwrap_err();
        assert!(matches!(err, ArchiveError::MalformedTemplate { .. }));
    }

    #[test]
    fn unterminated_placeholders_are_malformed() {
        let props = MessageProperties::new();
        assert!(matches!(
            resolve("a-[ns/x", &context(&props)),
            Err(ArchiveError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            resolve("a-{yyyy", &context(&props)),
            Err(ArchiveError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn date_year_matches_clock() {
        let props = MessageProperties::new();
        let before = Local::now().year();
        let out = resolve("{yyyy}", &context(&props)).unwrap();
        let after = Local::now().year();
        assert_eq!(out.len(), 4);
        let year: i32 = out.parse().unwrap();
        assert!(year == before || year == after);
    }

    #[test]
    fn date_placeholders_share_one_instant() {
        let props = MessageProperties::new();
        let out = Resolver::new()
            .resolve_at("%TS|{yyyy-MM-dd}|{HH}|{ SSS }", &context(&props), &instant())
            .unwrap();
        assert_eq!(out, "2023.11.02_08-30-15.007|2023-11-02|08|007");
    }

    #[test]
    fn resolved_values_are_literal() {
        let props = MessageProperties::new()
            .with("ns", "a", "[ns/b]")
            .with("ns", "b", "never")
            .with("ns", "c", "{yyyy}]");
        let out = Resolver::new()
            .resolve_at("[ns/a]-[ns/c]-{yy}", &context(&props), &instant())
            .unwrap();
        assert_eq!(out, "[ns/b]-{yyyy}]-23");
    }

    #[test]
    fn date_closed_after_dynamic_value_is_unterminated() {
        let props = MessageProperties::new().with("ns", "a", "x");
        let err = Resolver::new()
            .resolve_at("{yy[ns/a]}", &context(&props), &instant())
            .unwrap_err();
        assert!(matches!(err, ArchiveError::MalformedTemplate { .. }));
    }

    #[test]
    fn same_reference_repeated() {
        let props = MessageProperties::new().with("ns", "a", "v");
        assert_eq!(resolve("[ns/a][ns/a]_[ns/a]", &context(&props)).unwrap(), "vv_v");
    }

    #[test]
    fn fixed_token_inside_reference_is_resolved_first() {
        let props = MessageProperties::new().with("ns", "testPartyFrom", "hit");
        assert_eq!(resolve("[ns/%fp]", &context(&props)).unwrap(), "hit");
    }

    #[test]
    fn end_to_end_template() {
        let props = MessageProperties::new().with(FILE_NS, "FileName", "V");
        let at = instant();
        let out = Resolver::new()
            .resolve_at(
                "start-%id-%TS-%fp-%tp-%fs-%ts-[http://sap.com/file/FileName]-{HH}-ende",
                &context(&props),
                &at,
            )
            .unwrap();
        assert_eq!(
            out,
            "start-asf34afasaffas3442-2023.11.02_08-30-15.007-testPartyFrom-testPartyTo-testServiceFrom-testServiceTo-V-08-ende"
        );
    }

    #[test]
    fn end_to_end_with_live_clock() {
        let props = MessageProperties::new().with(FILE_NS, "FileName", "V");
        let out = resolve(
            "start-%id-%TS-%fp-%tp-%fs-%ts-[http://sap.com/file/FileName]-{HH}-ende",
            &context(&props),
        )
        .unwrap();
        let rest = out.strip_prefix("start-asf34afasaffas3442-").unwrap();
        let (timestamp, rest) = rest.split_at(PRIMARY_TIMESTAMP_PATTERN.len());
        assert!(timestamp.chars().all(|c| c.is_ascii_digit() || ".-_".contains(c)));
        let rest = rest
            .strip_prefix("-testPartyFrom-testPartyTo-testServiceFrom-testServiceTo-V-")
            .unwrap();
        let hour: u32 = rest.strip_suffix("-ende").unwrap().parse().unwrap();
        assert!(hour < 24);
    }

    #[test]
    fn audit_records_each_placeholder() {
        let props = MessageProperties::new().with("ns", "a", "v");
        let log = AuditLog::new();
        Resolver::new()
            .with_audit(Some(&log))
            .resolve_at("[ns/a]-{HH}", &context(&props), &instant())
            .unwrap();
        let texts: Vec<String> = log.entries().into_iter().map(|e| e.text).collect();
        assert_eq!(
            texts,
            vec![
                "found dynamic property a, namespace ns".to_string(),
                "dynamic property has value [v]".to_string(),
                "found date format HH".to_string(),
            ]
        );
    }

    #[test]
    fn parse_dynamic_ref_uses_last_slash() {
        let r = DynamicRef::parse("http://sap.com/file/FileName").unwrap();
        assert_eq!(r.namespace, "http://sap.com/file");
        assert_eq!(r.name, "FileName");
        let empty = DynamicRef::parse("/x").unwrap();
        assert_eq!(empty.namespace, "");
    }
}
