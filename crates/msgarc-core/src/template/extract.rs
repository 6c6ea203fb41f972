//! Delimited placeholder extraction (`[...]`, `{...}`).

use std::ops::Range;

use crate::error::{ArchiveError, Result};

/// A `begin…end` occurrence located in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosed<'a> {
    /// Byte range of the whole occurrence, delimiters included.
    pub span: Range<usize>,
    /// Text between the delimiters, trimmed.
    pub inner: &'a str,
}

/// Locates the first `begin` and the first `end` after it.
///
/// Returns `Ok(None)` when `begin` does not occur, and `MalformedTemplate` when
/// `begin` occurs without a closing `end`.
pub fn find_enclosed(s: &str, begin: char, end: char) -> Result<Option<Enclosed<'_>>> {
    let Some(pos) = s.find(begin) else {
        return Ok(None);
    };
    let body_start = pos + begin.len_utf8();
    let close = s[body_start..]
        .find(end)
        .map(|i| body_start + i)
        .ok_or_else(|| ArchiveError::malformed(format!("no closing '{end}' found")))?;

    Ok(Some(Enclosed {
        span: pos..close + end.len_utf8(),
        inner: s[body_start..close].trim(),
    }))
}

/// Returns the part within the first `begin`/`end` pair, trimmed.
///
/// `extract("abc[123]", '[', ']')` yields `Some("123")`.
pub fn extract(s: &str, begin: char, end: char) -> Result<Option<&str>> {
    Ok(find_enclosed(s, begin, end)?.map(|e| e.inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bracketed_part() {
        assert_eq!(extract("abc[123]", '[', ']').unwrap(), Some("123"));
        assert_eq!(extract("{HH}-x", '{', '}').unwrap(), Some("HH"));
    }

    #[test]
    fn no_begin_is_none() {
        assert_eq!(extract("abc123", '[', ']').unwrap(), None);
        assert_eq!(extract("", '{', '}').unwrap(), None);
        assert_eq!(extract("closer only]", '[', ']').unwrap(), None);
    }

    #[test]
    fn unterminated_is_malformed() {
        let err = extract("abc[123", '[', ']').unwrap_err();
        assert!(matches!(err, ArchiveError::MalformedTemplate { .. }));
        assert!(err.to_string().contains("']'"));
    }

    #[test]
    fn closer_before_opener_is_malformed() {
        assert!(extract("a]b[c", '[', ']').is_err());
    }

    #[test]
    fn leftmost_pair_and_trimmed() {
        assert_eq!(extract("x[ a ]y[b]", '[', ']').unwrap(), Some("a"));
        let e = find_enclosed("x[ a ]y[b]", '[', ']').unwrap().unwrap();
        assert_eq!(e.span, 1..6);
        assert_eq!(&"x[ a ]y[b]"[e.span.clone()], "[ a ]");
    }

    #[test]
    fn nested_opener_stays_in_inner() {
        assert_eq!(extract("[a[b]c]", '[', ']').unwrap(), Some("a[b"));
    }

    #[test]
    fn repeated_calls_are_stable() {
        let s = "pre-[ns/x]-post";
        assert_eq!(extract(s, '[', ']').unwrap(), extract(s, '[', ']').unwrap());
    }
}
