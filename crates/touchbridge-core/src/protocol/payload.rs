//! Base64 text payloads.
//!
//! Clipboard contents and typed text may contain spaces and newlines, which
//! would break the one-command-per-line framing.  They therefore travel as
//! standard-alphabet base64 without line wrapping.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

use crate::protocol::response::ErrorCode;

/// Standard alphabet; pads on encode, accepts padded or unpadded input on decode.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes UTF-8 text as a single-line base64 payload.
///
/// # Examples
///
/// ```rust
/// use touchbridge_core::protocol::payload::encode_text;
///
/// assert_eq!(encode_text("hello"), "aGVsbG8=");
/// ```
pub fn encode_text(text: &str) -> String {
    PAYLOAD_ENGINE.encode(text.as_bytes())
}

/// Decodes a base64 payload into text.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// rejected; only malformed base64 is an error.
///
/// # Errors
///
/// Returns [`ErrorCode::InvalidBase64`] if `payload` is not valid base64.
pub fn decode_text(payload: &str) -> Result<String, ErrorCode> {
    let bytes = PAYLOAD_ENGINE
        .decode(payload.trim())
        .map_err(|_| ErrorCode::InvalidBase64)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_hello() {
        assert_eq!(encode_text("hello"), "aGVsbG8=");
    }

    #[test]
    fn test_encode_never_wraps_long_text() {
        // Arrange
        let long = "x".repeat(1000);

        // Act
        let encoded = encode_text(&long);

        // Assert – a single protocol line must not contain newlines
        assert!(!encoded.contains('\n'));
        assert!(!encoded.contains('\r'));
    }

    #[test]
    fn test_decode_hello() {
        assert_eq!(decode_text("aGVsbG8=").unwrap(), "hello");
    }

    #[test]
    fn test_decode_accepts_missing_padding() {
        assert_eq!(decode_text("aGVsbG8").unwrap(), "hello");
    }

    #[test]
    fn test_decode_empty_payload_is_empty_text() {
        assert_eq!(decode_text("").unwrap(), "");
    }

    #[test]
    fn test_decode_multibyte_text() {
        let encoded = encode_text("héllo ✓\nline two");
        assert_eq!(decode_text(&encoded).unwrap(), "héllo ✓\nline two");
    }

    #[test]
    fn test_decode_rejects_invalid_characters() {
        assert_eq!(decode_text("not base64!"), Err(ErrorCode::InvalidBase64));
    }

    #[test]
    fn test_decode_replaces_invalid_utf8() {
        // 0xFF is never valid in UTF-8.
        let encoded = PAYLOAD_ENGINE.encode([b'a', 0xFF, b'b']);
        assert_eq!(decode_text(&encoded).unwrap(), "a\u{FFFD}b");
    }
}
