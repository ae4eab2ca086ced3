//! `Range:` header parsing, single range only, bytes unit.

/// What to do with a `Range` header.
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve `content[start..=end]` as a 206.
    Valid { start: usize, end: usize },
    /// Serve 416 with `Content-Range: bytes */<size>`.
    NotSatisfiable,
    /// No header, or one we ignore; serve the full body.
    None,
}

/// Parse a `Range` header against the file size.
///
/// Accepted forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
/// Multi-range requests and syntactically malformed specs are ignored
/// rather than rejected, matching the lenient behavior of standard
/// content responders.
pub fn parse_range_header(header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::None;
    };
    if spec.contains(',') {
        return RangeOutcome::None;
    }
    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::None;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix form: the last N bytes.
    if start_str.is_empty() {
        let Ok(suffix) = end_str.parse::<usize>() else {
            return RangeOutcome::None;
        };
        if suffix == 0 || file_size == 0 {
            return RangeOutcome::NotSatisfiable;
        }
        return RangeOutcome::Valid {
            start: file_size.saturating_sub(suffix),
            end: file_size - 1,
        };
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::None;
    };
    if start >= file_size {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        file_size - 1
    } else {
        let Ok(end) = end_str.parse::<usize>() else {
            return RangeOutcome::None;
        };
        if end < start {
            return RangeOutcome::NotSatisfiable;
        }
        end.min(file_size - 1)
    };

    RangeOutcome::Valid { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_serves_full_body() {
        assert_eq!(parse_range_header(None, 100), RangeOutcome::None);
    }

    #[test]
    fn fixed_range() {
        assert_eq!(
            parse_range_header(Some("bytes=0-9"), 100),
            RangeOutcome::Valid { start: 0, end: 9 }
        );
    }

    #[test]
    fn open_ended_range() {
        assert_eq!(
            parse_range_header(Some("bytes=50-"), 100),
            RangeOutcome::Valid { start: 50, end: 99 }
        );
    }

    #[test]
    fn suffix_range() {
        assert_eq!(
            parse_range_header(Some("bytes=-20"), 100),
            RangeOutcome::Valid { start: 80, end: 99 }
        );
        // A suffix longer than the file yields the whole file.
        assert_eq!(
            parse_range_header(Some("bytes=-500"), 100),
            RangeOutcome::Valid { start: 0, end: 99 }
        );
    }

    #[test]
    fn end_clamped_to_file_size() {
        assert_eq!(
            parse_range_header(Some("bytes=90-200"), 100),
            RangeOutcome::Valid { start: 90, end: 99 }
        );
    }

    #[test]
    fn start_past_end_of_file() {
        assert_eq!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=100-"), 100),
            RangeOutcome::NotSatisfiable
        );
    }

    #[test]
    fn inverted_range() {
        assert_eq!(
            parse_range_header(Some("bytes=9-0"), 100),
            RangeOutcome::NotSatisfiable
        );
    }

    #[test]
    fn malformed_specs_are_ignored() {
        assert_eq!(parse_range_header(Some("bytes=a-b"), 100), RangeOutcome::None);
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::None
        );
        assert_eq!(parse_range_header(Some("lines=0-9"), 100), RangeOutcome::None);
        assert_eq!(parse_range_header(Some("bytes=42"), 100), RangeOutcome::None);
    }
}
