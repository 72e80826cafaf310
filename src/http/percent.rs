//! Percent-encoding helpers for URL paths.
//!
//! Request paths arrive percent-encoded and must be decoded before they can
//! be resolved against the filesystem; directory listing links go the other
//! way. Only the path flavor is implemented: `+` is not a space here.

/// Decode `%XX` escapes in a URL path.
///
/// Escapes that are not followed by two hex digits are kept literally, the
/// way lenient servers treat them. Returns `None` when the decoded bytes are
/// not valid UTF-8, since such a path cannot name a file we serve.
///
/// # Examples
/// ```
/// use tabserve::http::percent::decode;
/// assert_eq!(decode("/hello%20world.txt").as_deref(), Some("/hello world.txt"));
/// assert_eq!(decode("/100%").as_deref(), Some("/100%"));
/// assert!(decode("/%ff%fe").is_none());
/// ```
pub fn decode(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (hex_value(bytes.get(i + 1)), hex_value(bytes.get(i + 2))) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).ok()
}

/// Percent-encode a path for use as an href in generated HTML.
///
/// Unreserved characters and `/` pass through; everything else (spaces,
/// quotes, non-ASCII bytes) is escaped, matching what the original handler
/// emits in its listing pages.
pub fn encode_href(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.as_bytes() {
        if is_href_safe(*byte) {
            out.push(*byte as char);
        } else {
            out.push('%');
            out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

fn is_href_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'/')
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    match byte? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
