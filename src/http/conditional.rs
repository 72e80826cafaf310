//! Conditional request support: `ETag` and `Last-Modified` revalidation.
//!
//! `If-None-Match` takes precedence over `If-Modified-Since` when both are
//! present (RFC 9110 §13.1.3); callers enforce that ordering.

use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Compute a quoted `ETag` for a response body.
pub fn etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Does the client's `If-None-Match` header match our `ETag`?
///
/// Accepts a single tag, a comma-separated list, or `*`. A match means the
/// client's copy is current and the response should be 304.
pub fn none_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .map(str::trim)
            .any(|tag| tag == etag || tag == "*")
    })
}

/// Format a timestamp as an HTTP-date (IMF-fixdate, always GMT).
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP-date from a request header.
///
/// RFC 2822 parsing covers IMF-fixdate including the obsolete `GMT` zone;
/// anything unparseable is treated as an absent header.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Is the file still the version the client saw?
///
/// Returns true (respond 304) when the file's modification time, truncated
/// to whole seconds like the header itself, is not newer than the
/// `If-Modified-Since` value.
pub fn unmodified_since(if_modified_since: Option<&str>, mtime: SystemTime) -> bool {
    let Some(header_time) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let Ok(elapsed) = mtime.duration_since(UNIX_EPOCH) else {
        return false;
    };
    let mtime_secs = i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX);
    mtime_secs <= header_time.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_etag_is_quoted_and_stable() {
        let tag = etag(b"some bytes");
        assert!(tag.starts_with('"') && tag.ends_with('"'));
        assert_eq!(tag, etag(b"some bytes"));
        assert_ne!(tag, etag(b"other bytes"));
    }

    #[test]
    fn test_none_match() {
        let tag = "\"deadbeef\"";
        assert!(none_match(Some("\"deadbeef\""), tag));
        assert!(none_match(Some("\"aaa\", \"deadbeef\""), tag));
        assert!(none_match(Some("*"), tag));
        assert!(!none_match(Some("\"other\""), tag));
        assert!(!none_match(None, tag));
    }

    #[test]
    fn test_http_date_format() {
        assert_eq!(http_date(UNIX_EPOCH), "Thu, 01 Jan 1970 00:00:00 GMT");
        let later = UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(http_date(later), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_parse_http_date() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("not a date").is_none());
    }

    #[test]
    fn test_date_roundtrip() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let parsed = parse_http_date(&http_date(t)).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_unmodified_since() {
        let mtime = UNIX_EPOCH + Duration::from_secs(784_111_777);
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(unmodified_since(Some(header), mtime));
        // Sub-second file precision must not defeat the whole-second header
        assert!(unmodified_since(Some(header), mtime + Duration::from_millis(900)));
        // A strictly newer file is modified
        assert!(!unmodified_since(Some(header), mtime + Duration::from_secs(1)));
        assert!(!unmodified_since(None, mtime));
        assert!(!unmodified_since(Some("garbage"), mtime));
    }
}
