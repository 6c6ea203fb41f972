//! Error type shared by template resolution, uniqueness search and archiving.

use std::path::PathBuf;

/// Failure while turning a template into an archived file.
///
/// Every variant aborts the current message: no partially resolved filename
/// is ever handed to the filesystem layer.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Unterminated placeholder, dynamic reference without `/`, or a date
    /// pattern that cannot be formatted.
    #[error("faulty filename template: {reason}")]
    MalformedTemplate { reason: String },

    /// Dynamic property absent while running with the strict policy.
    #[error("dynamic property {name} (namespace {namespace}) is not set on the message")]
    UnresolvedReference { namespace: String, name: String },

    /// Every candidate up to the uniqueness ceiling already exists.
    #[error("not able to find a unique archive filename for {} after {attempts} attempts", base.display())]
    NoUniqueNameAvailable { base: PathBuf, attempts: u32 },

    /// Directory creation or payload write failed.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ArchiveError::MalformedTemplate {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn malformed_display_names_reason() {
        let e = ArchiveError::malformed("no closing '}' found");
        assert_eq!(
            e.to_string(),
            "faulty filename template: no closing '}' found"
        );
    }

    #[test]
    fn io_keeps_source() {
        let e = ArchiveError::io(
            "write /tmp/x",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(e.to_string(), "write /tmp/x");
        assert_eq!(e.source().unwrap().to_string(), "disk full");
    }
}
