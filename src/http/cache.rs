//! Conditional-GET validators.
//!
//! `ETag` generation plus HTTP-date handling for
//! `Last-Modified`/`If-Modified-Since`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

/// Preferred format (IMF-fixdate), also used when emitting dates.
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
/// Obsolete RFC 850 format, accepted on input only.
const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
/// ANSI C `asctime()` format, accepted on input only.
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Generate a quoted `ETag` from file content using fast hashing.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check the client's `If-None-Match` header against the server `ETag`.
///
/// Handles a single `ETag`, a comma-separated list, and the `*`
/// wildcard.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Format a filesystem timestamp as an HTTP date (IMF-fixdate, UTC).
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(IMF_FIXDATE).to_string()
}

/// Parse an HTTP date in any of the three formats RFC 9110 accepts.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let value = value.trim();
    for fmt in [IMF_FIXDATE, RFC_850, ASCTIME] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(SystemTime::from(Utc.from_utc_datetime(&parsed)));
        }
    }
    None
}

/// Whether the file is unchanged relative to `If-Modified-Since`.
///
/// Compared at second granularity; HTTP dates carry no sub-second
/// precision. An unparsable header means "modified" (send the body).
pub fn not_modified_since(
    if_modified_since: Option<&str>,
    modified: Option<SystemTime>,
) -> bool {
    let (Some(header), Some(modified)) = (if_modified_since, modified) else {
        return false;
    };
    let Some(since) = parse_http_date(header) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= DateTime::<Utc>::from(since).timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn etag_is_quoted_and_stable() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"hello world"));
        assert_ne!(etag, generate_etag(b"other content"));
    }

    #[test]
    fn etag_match_variants() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn http_date_round_trip() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let formatted = format_http_date(time);
        assert_eq!(parse_http_date(&formatted), Some(time));
    }

    #[test]
    fn parses_all_three_formats() {
        // The same instant in IMF-fixdate, RFC 850, and asctime form.
        let expected = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(
            parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT"),
            Some(expected)
        );
        assert_eq!(parse_http_date("Sun Nov  6 08:49:37 1994"), Some(expected));
    }

    #[test]
    fn rejects_malformed_date() {
        assert_eq!(parse_http_date("not a date"), None);
        assert_eq!(parse_http_date(""), None);
    }

    #[test]
    fn exact_modification_time_is_not_modified() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let header = format_http_date(time);
        assert!(not_modified_since(Some(&header), Some(time)));
    }

    #[test]
    fn earlier_validator_means_modified() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let header = format_http_date(time - Duration::from_secs(60));
        assert!(!not_modified_since(Some(&header), Some(time)));
    }

    #[test]
    fn later_validator_is_not_modified() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let header = format_http_date(time + Duration::from_secs(60));
        assert!(not_modified_since(Some(&header), Some(time)));
    }

    #[test]
    fn unparsable_validator_means_modified() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert!(!not_modified_since(Some("garbage"), Some(time)));
        assert!(!not_modified_since(None, Some(time)));
    }
}
