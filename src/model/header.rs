//! Typed message headers.
//!
//! Every header a message can carry is one arm of [`Header`]; the arm knows
//! its wire tag and how to encode itself, and [`Header::decode`] rebuilds
//! an arm from a lowercased tag plus raw value. Tags the model does not
//! know are ignored by returning `None`.

use chrono::{DateTime, FixedOffset};

use crate::error::{MailError, Result};
use crate::model::address::Address;
use crate::parser::address as tokenizer;
use crate::parser::encoding;

/// A typed message header.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    /// `From`: the single sender address.
    Sender(Address),
    /// `To`: one or more recipient addresses, in order.
    Recipients(Vec<Address>),
    /// `Subject`: free Unicode text, possibly empty.
    Subject(String),
    /// `Date`: the send instant with its timezone.
    Date(DateTime<FixedOffset>),
    /// `Content-Type`: media type plus charset (empty charset marks the
    /// multipart envelope).
    ContentType { media: String, charset: String },
    /// `Content-Transfer-Encoding`: the body transfer encoding name.
    ContentTransferEncoding(String),
    /// `MIME-Version`.
    MimeVersion(String),
}

impl Header {
    /// Build a `To` header, rejecting an empty recipient list.
    pub fn recipients(addresses: Vec<Address>) -> Result<Self> {
        if addresses.is_empty() {
            return Err(MailError::EmptyInput("recipient list"));
        }
        Ok(Self::Recipients(addresses))
    }

    /// The wire tag for this header.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Sender(_) => "From",
            Self::Recipients(_) => "To",
            Self::Subject(_) => "Subject",
            Self::Date(_) => "Date",
            Self::ContentType { .. } => "Content-Type",
            Self::ContentTransferEncoding(_) => "Content-Transfer-Encoding",
            Self::MimeVersion(_) => "MIME-Version",
        }
    }

    /// Encode the header as its full `Tag: value` line (without newline).
    pub fn encode(&self) -> String {
        match self {
            Self::Sender(address) => format!("From: {address}"),
            Self::Recipients(addresses) => {
                let joined = addresses
                    .iter()
                    .map(Address::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("To: {joined}")
            }
            Self::Subject(text) => {
                if text.is_ascii() {
                    format!("Subject: {text}")
                } else {
                    format!("Subject: {}", encoding::encode_word(text))
                }
            }
            Self::Date(date) => format!("Date: {}", encoding::encode_date(date)),
            Self::ContentType { media, charset } => {
                if charset.is_empty() {
                    format!("Content-Type: {media}; boundary=frontier")
                } else {
                    format!("Content-Type: {media}; charset=\"{charset}\"")
                }
            }
            Self::ContentTransferEncoding(name) => {
                format!("Content-Transfer-Encoding: {name}")
            }
            Self::MimeVersion(version) => format!("MIME-Version: {version}"),
        }
    }

    /// Decode a header from its lowercased tag and raw value.
    ///
    /// Returns `Ok(None)` for tags the model does not represent; a
    /// recognised tag with a bad value is an error, never silently
    /// absorbed.
    pub fn decode(name: &str, value: &str) -> Result<Option<Self>> {
        let header = match name {
            "from" => Self::Sender(Address::decode(value)?),
            "to" => Self::recipients(decode_address_list(value)?)?,
            "subject" => Self::Subject(decode_subject(value)?),
            "date" => Self::Date(encoding::decode_date(value)?),
            "content-type" => decode_content_type(value)?,
            "content-transfer-encoding" => {
                if value.is_empty() {
                    return Err(MailError::EmptyInput("transfer encoding"));
                }
                Self::ContentTransferEncoding(value.to_string())
            }
            "mime-version" => {
                if value.is_empty() {
                    return Err(MailError::EmptyInput("mime version"));
                }
                Self::MimeVersion(value.to_string())
            }
            _ => return Ok(None),
        };
        Ok(Some(header))
    }
}

/// Decode a comma-separated recipient list.
fn decode_address_list(raw: &str) -> Result<Vec<Address>> {
    if raw.is_empty() {
        return Err(MailError::EmptyInput("recipient list"));
    }
    tokenizer::decode(raw)
        .into_iter()
        .map(|(display_name, local, domain)| {
            Address::new(display_name, local, domain)
                .map_err(|_| MailError::MalformedAddress(raw.to_string()))
        })
        .collect()
}

/// Decode a subject value, resolving the encoded-word form when present.
fn decode_subject(raw: &str) -> Result<String> {
    if raw.starts_with(encoding::ENCODED_WORD_PREFIX) {
        encoding::decode_word(raw)
    } else {
        Ok(raw.to_string())
    }
}

/// Decode a `Content-Type` value.
///
/// The value splits on `"; "`; a `charset=` tail yields the media type
/// with its unquoted charset, and any other parameter is read as the
/// multipart envelope form.
fn decode_content_type(raw: &str) -> Result<Header> {
    let (media, tail) = raw
        .split_once("; ")
        .ok_or_else(|| MailError::MalformedHeader {
            header: "Content-Type",
            value: raw.to_string(),
        })?;
    if tail.contains("charset") {
        let charset = tail.replace("charset=\"", "").replace('"', "");
        Ok(Header::ContentType {
            media: media.to_string(),
            charset,
        })
    } else {
        Ok(Header::ContentType {
            media: "multipart/alternative".to_string(),
            charset: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn sample_date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap()
    }

    fn raw_value(encoded: &str) -> &str {
        encoded.split_once(": ").expect("tagged header").1
    }

    #[test]
    fn test_sender_encode() {
        let header = Header::Sender(Address::bare("a", "b").unwrap());
        assert_eq!(header.encode(), "From: a@b");
    }

    #[test]
    fn test_sender_roundtrip() {
        let header = Header::Sender(Address::new("Alice Rossi", "alice", "example.com").unwrap());
        let encoded = header.encode();
        let decoded = Header::decode("from", raw_value(&encoded)).unwrap().unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_recipients_encode_joins_with_comma() {
        let header = Header::recipients(vec![
            Address::bare("c", "d").unwrap(),
            Address::new("User Two", "e", "f").unwrap(),
        ])
        .unwrap();
        assert_eq!(header.encode(), "To: c@d, User Two <e@f>");
    }

    #[test]
    fn test_recipients_roundtrip() {
        let header = Header::recipients(vec![
            Address::bare("c", "d").unwrap(),
            Address::new("Anna Maria Bianchi", "anna", "example.com").unwrap(),
        ])
        .unwrap();
        let encoded = header.encode();
        let decoded = Header::decode("to", raw_value(&encoded)).unwrap().unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_recipients_rejects_empty_list() {
        assert!(Header::recipients(Vec::new()).is_err());
        assert!(Header::decode("to", "").is_err());
    }

    #[test]
    fn test_subject_ascii_verbatim() {
        let header = Header::Subject("hi".to_string());
        assert_eq!(header.encode(), "Subject: hi");
    }

    #[test]
    fn test_subject_non_ascii_encoded_word() {
        let header = Header::Subject("ciào".to_string());
        assert_eq!(header.encode(), "Subject: =?utf-8?B?Y2nDoG8=?=");
        let decoded = Header::decode("subject", "=?utf-8?B?Y2nDoG8=?=")
            .unwrap()
            .unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_subject_empty_is_legal() {
        let header = Header::decode("subject", "").unwrap().unwrap();
        assert_eq!(header, Header::Subject(String::new()));
    }

    #[test]
    fn test_date_roundtrip() {
        let header = Header::Date(sample_date());
        let encoded = header.encode();
        let decoded = Header::decode("date", raw_value(&encoded)).unwrap().unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_date_rejects_garbage() {
        assert!(Header::decode("date", "yesterday-ish").is_err());
    }

    #[test]
    fn test_content_type_with_charset() {
        let header = Header::ContentType {
            media: "text/plain".to_string(),
            charset: "us-ascii".to_string(),
        };
        assert_eq!(
            header.encode(),
            "Content-Type: text/plain; charset=\"us-ascii\""
        );
        let decoded = Header::decode("content-type", "text/plain; charset=\"us-ascii\"")
            .unwrap()
            .unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_content_type_multipart_boundary() {
        let header = Header::ContentType {
            media: "multipart/alternative".to_string(),
            charset: String::new(),
        };
        assert_eq!(
            header.encode(),
            "Content-Type: multipart/alternative; boundary=frontier"
        );
        // Any non-charset parameter reads back as the multipart envelope.
        let decoded = Header::decode(
            "content-type",
            "multipart/alternative; boundary=frontier",
        )
        .unwrap()
        .unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_content_type_without_parameter_is_malformed() {
        assert!(Header::decode("content-type", "text/plain").is_err());
    }

    #[test]
    fn test_unknown_tag_ignored() {
        assert_eq!(Header::decode("x-mailer", "anything").unwrap(), None);
        assert_eq!(Header::decode("received", "by host").unwrap(), None);
    }

    #[test]
    fn test_plain_value_headers() {
        let cte = Header::ContentTransferEncoding("base64".to_string());
        assert_eq!(cte.encode(), "Content-Transfer-Encoding: base64");
        let mime = Header::MimeVersion("1.0".to_string());
        assert_eq!(mime.encode(), "MIME-Version: 1.0");
        assert_eq!(
            Header::decode("mime-version", "1.0").unwrap().unwrap(),
            mime
        );
    }

    #[test]
    fn test_tags() {
        assert_eq!(Header::Subject(String::new()).tag(), "Subject");
        assert_eq!(Header::Date(sample_date()).tag(), "Date");
        assert_eq!(
            Header::Sender(Address::bare("a", "b").unwrap()).tag(),
            "From"
        );
    }
}
