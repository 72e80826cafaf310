//! `Range` header parsing (RFC 7233, single `bytes=` range).

/// A resolved byte range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes the range covers.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// What to do with a request after looking at its `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve the given slice with 206 Partial Content.
    Satisfiable(ByteRange),
    /// Respond 416 Range Not Satisfiable.
    Unsatisfiable,
    /// No usable range; serve the full body with 200.
    Ignored,
}

/// Parse a `Range` header value against a body of `len` bytes.
///
/// Handles `bytes=start-end`, `bytes=start-` and `bytes=-suffix`. Multiple
/// ranges and units other than `bytes` are ignored rather than rejected,
/// which downgrades the response to a plain 200.
///
/// # Examples
/// ```
/// use tabserve::http::range::{parse, ByteRange, RangeOutcome};
/// assert_eq!(
///     parse(Some("bytes=0-9"), 100),
///     RangeOutcome::Satisfiable(ByteRange { start: 0, end: 9 })
/// );
/// assert_eq!(parse(None, 100), RangeOutcome::Ignored);
/// ```
pub fn parse(header: Option<&str>, len: u64) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Ignored;
    };

    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Nothing is satisfiable against an empty body
    if len == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    if start_str.is_empty() {
        return parse_suffix(end_str, len);
    }

    let Ok(start) = start_str.parse::<u64>() else {
        return RangeOutcome::Ignored;
    };
    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        len - 1
    } else {
        let Ok(end) = end_str.parse::<u64>() else {
            return RangeOutcome::Ignored;
        };
        if end < start {
            return RangeOutcome::Unsatisfiable;
        }
        end.min(len - 1)
    };

    RangeOutcome::Satisfiable(ByteRange { start, end })
}

/// `bytes=-suffix`: the last `suffix` bytes of the body.
fn parse_suffix(suffix_str: &str, len: u64) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<u64>() else {
        return RangeOutcome::Ignored;
    };
    if suffix == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Satisfiable(ByteRange {
        start: len.saturating_sub(suffix),
        end: len - 1,
    })
}
