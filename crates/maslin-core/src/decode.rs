//! # Percent Decoder
//!
//! Decodes raw field values from their percent-encoded wire form.
//!
//! - `%XX` (two hex digits, either case) becomes the byte `0xXX`
//! - A `%` not followed by two hex digits is passed through literally,
//!   together with whatever follows it
//! - `+` is not special
//! - Text without `%` is returned unchanged
//!
//! Decoding always runs after the line has been split, so a decoded value
//! may legitimately contain the delimiter (`a%2Cb` decodes to `a,b`).

use crate::MaslinError;
use crate::primitives::PERCENT;

/// Decode `raw` into `out`, replacing its previous content.
///
/// `out` is cleared first, so a reused buffer never carries bytes from an
/// earlier value.
pub fn decode_into(raw: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(raw.len());

    let mut i = 0;
    while i < raw.len() {
        let byte = raw[i];
        if byte == PERCENT && i + 2 < raw.len() {
            if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(byte);
        i += 1;
    }
}

/// Decode a single value into an owned string.
///
/// Fails with `InvalidUtf8` if the decoded bytes are not UTF-8.
pub fn decode(raw: &str) -> Result<String, MaslinError> {
    let mut out = Vec::new();
    decode_into(raw.as_bytes(), &mut out);
    String::from_utf8(out).map_err(|_| MaslinError::InvalidUtf8 {
        field: "value".to_string(),
    })
}

/// Encode a value for the wire.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) are kept; every other
/// byte, including the delimiter and `%` itself, becomes `%XX`.
pub fn encode(value: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(value.len());
    for &byte in value.as_bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[usize::from(byte >> 4)] as char);
            out.push(HEX[usize::from(byte & 0x0f)] as char);
        }
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
