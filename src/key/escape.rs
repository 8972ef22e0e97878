//! Delimiter and escaping rules shared by every token segment.
//!
//! A segment payload keeps `[A-Za-z0-9_.-]` as is and percent-escapes every
//! other byte with upper-case hex. [`SEGMENT_DELIMITER`] is outside that set,
//! so it can never appear inside an escaped payload, and nothing in the
//! output needs further escaping inside a URL path segment.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::error::KeyError;

/// Separates the partition segment from the sort segment.
///
/// `~` is unreserved in URIs, so a client or proxy that normalizes URIs may
/// turn an escaped `%7E` back into `~`. Such a token gains segments and is
/// rejected as malformed by the decoder; it is never read as another key.
pub const SEGMENT_DELIMITER: char = '~';

/// Introduces a two-digit hex escape.
pub const ESCAPE_MARKER: char = '%';

/// Escaped form of [`SEGMENT_DELIMITER`].
const ESCAPED_DELIMITER: &str = "%7E";

/// Bytes that pass through escaping untouched.
pub fn is_unescaped(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.')
}

/// Percent-escape a payload.
pub fn escape(text: &str) -> String {
    // urlencoding leaves `~` alone as an unreserved character
    urlencoding::encode(text).replace(SEGMENT_DELIMITER, ESCAPED_DELIMITER)
}

/// Reverse [`escape`], rejecting stray characters and broken escapes.
pub fn unescape(payload: &str) -> Result<String, KeyError> {
    let mut bytes = payload.bytes();
    while let Some(byte) = bytes.next() {
        if byte == ESCAPE_MARKER as u8 {
            match (bytes.next(), bytes.next()) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {}
                _ => return Err(KeyError::malformed("truncated or invalid percent escape")),
            }
        } else if !is_unescaped(byte) {
            return Err(KeyError::malformed(format!(
                "unescaped character {:?}",
                char::from(byte)
            )));
        }
    }

    urlencoding::decode(payload)
        .map(|text| text.into_owned())
        .map_err(|_| KeyError::malformed("escaped bytes are not valid UTF-8"))
}

/// Text form of binary key values.
pub fn encode_binary(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Reverse [`encode_binary`].
pub fn decode_binary(text: &str) -> Result<Vec<u8>, KeyError> {
    URL_SAFE_NO_PAD
        .decode(text)
        .map_err(|e| KeyError::malformed(format!("invalid base64url: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_is_never_unescaped() {
        assert!(!is_unescaped(SEGMENT_DELIMITER as u8));
        assert!(!is_unescaped(ESCAPE_MARKER as u8));
        assert_eq!(escape("~"), ESCAPED_DELIMITER);
        assert!(!escape("a~b~~c").contains(SEGMENT_DELIMITER));
    }

    #[test]
    fn test_escape_reserved_characters() {
        assert_eq!(escape("a/b"), "a%2Fb");
        assert_eq!(escape("user#1"), "user%231");
        assert_eq!(escape("a b+c?d"), "a%20b%2Bc%3Fd");
        assert_eq!(escape("100%"), "100%25");
        assert_eq!(escape("plain-text_1.0"), "plain-text_1.0");
    }

    #[test]
    fn test_escape_output_alphabet() {
        let escaped = escape("héllo/wörld ~ ?#&=;:@!$'()*,[]");
        assert!(
            escaped
                .bytes()
                .all(|b| is_unescaped(b) || b == ESCAPE_MARKER as u8),
            "unexpected character in {}",
            escaped
        );
    }

    #[test]
    fn test_unescape_roundtrip() {
        for text in ["", "a/b", "~", "%", "héllo", "日本", "a%2Fb", "\u{0}"] {
            assert_eq!(unescape(&escape(text)).unwrap(), text);
        }
    }

    #[test]
    fn test_unescape_accepts_lowercase_hex() {
        assert_eq!(unescape("a%2fb").unwrap(), "a/b");
    }

    #[test]
    fn test_unescape_rejects_invalid_input() {
        for bad in ["%", "%2", "%zz", "a/b", "a~b", "a b", "a+b", "%FF"] {
            let err = unescape(bad).unwrap_err();
            assert!(err.is_malformed_token(), "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_binary_text_form() {
        let bytes = vec![0u8, 0xff, 0xfe, b'~', b'/'];
        let text = encode_binary(&bytes);
        assert!(text.bytes().all(is_unescaped));
        assert_eq!(decode_binary(&text).unwrap(), bytes);
        assert!(decode_binary("not base64!").is_err());
    }
}
