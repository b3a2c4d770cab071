//! Transfer-text primitives: Base64 bodies, RFC 2047 encoded-words, and
//! RFC 5322 dates.

use base64::{engine::general_purpose::STANDARD as base64, Engine};
use chrono::{DateTime, FixedOffset};

use crate::error::{MailError, Result};

/// Marker opening an encoded-word produced by [`encode_word`].
pub const ENCODED_WORD_PREFIX: &str = "=?utf-8?B?";

/// Marker closing an encoded-word.
const ENCODED_WORD_SUFFIX: &str = "?=";

/// Base64-encode a body.
pub fn encode_base64(text: &str) -> String {
    base64.encode(text.as_bytes())
}

/// Decode a Base64 body back to text.
pub fn decode_base64(encoded: &str) -> Result<String> {
    let bytes = base64
        .decode(encoded.trim_end().as_bytes())
        .map_err(|e| MailError::MalformedBody(format!("invalid base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| MailError::MalformedBody(format!("base64 payload is not UTF-8: {e}")))
}

/// Encode a header value as a `=?utf-8?B?…?=` encoded-word.
pub fn encode_word(text: &str) -> String {
    format!(
        "{}{}{}",
        ENCODED_WORD_PREFIX,
        base64.encode(text.as_bytes()),
        ENCODED_WORD_SUFFIX
    )
}

/// Decode a `=?utf-8?B?…?=` encoded-word back to its text.
pub fn decode_word(encoded: &str) -> Result<String> {
    let payload = encoded
        .strip_prefix(ENCODED_WORD_PREFIX)
        .and_then(|rest| rest.strip_suffix(ENCODED_WORD_SUFFIX))
        .ok_or_else(|| MailError::MalformedHeader {
            header: "Subject",
            value: encoded.to_string(),
        })?;
    let bytes = base64
        .decode(payload.as_bytes())
        .map_err(|_| MailError::MalformedHeader {
            header: "Subject",
            value: encoded.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|_| MailError::MalformedHeader {
        header: "Subject",
        value: encoded.to_string(),
    })
}

/// Encode an instant as an RFC 5322 date.
pub fn encode_date(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc2822()
}

/// Parse an RFC 5322 date.
pub fn decode_date(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .map_err(|_| MailError::MalformedDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_base64_roundtrip() {
        let body = "<html><p>ciào</p></html>";
        assert_eq!(decode_base64(&encode_base64(body)).unwrap(), body);
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(decode_base64("not base64 at all!").is_err());
    }

    #[test]
    fn test_encode_word_known_value() {
        // "ciào" → Y2nDoG8= prefixed and suffixed
        assert_eq!(encode_word("ciào"), "=?utf-8?B?Y2nDoG8=?=");
    }

    #[test]
    fn test_decode_word_roundtrip() {
        let word = encode_word("Résumé du projet");
        assert_eq!(decode_word(&word).unwrap(), "Résumé du projet");
    }

    #[test]
    fn test_decode_word_rejects_missing_suffix() {
        assert!(decode_word("=?utf-8?B?Y2nDoG8=").is_err());
    }

    #[test]
    fn test_date_roundtrip() {
        let date = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap();
        let encoded = encode_date(&date);
        assert_eq!(decode_date(&encoded).unwrap(), date);
    }

    #[test]
    fn test_decode_date_rejects_garbage() {
        assert!(decode_date("not a date").is_err());
        assert!(decode_date("").is_err());
    }
}
