//! Messages and their MIME parts.
//!
//! A [`Message`] is an ordered, non-empty list of [`Part`]s: exactly one
//! for plain singlepart mail, exactly three (envelope, text, html) for
//! `multipart/alternative`. The first part always carries the four
//! mandatory headers (From, To, Subject, Date). Encoding is bit-exact:
//! re-parsing an encoded message yields an equal message.

use chrono::{DateTime, FixedOffset};

use crate::error::{MailError, Result};
use crate::model::address::Address;
use crate::model::header::Header;
use crate::parser::encoding;
use crate::parser::entry::Fragment;

/// Fixed body of the multipart envelope part.
pub const MULTIPART_NOTICE: &str = "This is a message with multiple parts in MIME format.";

/// Base64 encoding of `<html>`; bodies starting with it are transfer-decoded.
const HTML_BASE64_PREFIX: &str = "PGh0bWw+";

/// One MIME part: an ordered list of headers plus a non-empty body.
///
/// Parts are built only by [`Message`] constructors; header order is
/// preserved exactly as inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    headers: Vec<Header>,
    body: String,
}

impl Part {
    fn new(headers: Vec<Header>, body: String) -> Result<Self> {
        if headers.is_empty() {
            return Err(MailError::EmptyInput("part headers"));
        }
        if body.is_empty() {
            return Err(MailError::EmptyInput("part body"));
        }
        Ok(Self { headers, body })
    }

    /// The part's headers, in stored order.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// The part's body, as constructed (never transfer-encoded).
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The `(media, charset)` of the part's `Content-Type`, if present.
    pub fn content_type(&self) -> Option<(&str, &str)> {
        self.headers.iter().find_map(|header| match header {
            Header::ContentType { media, charset } => Some((media.as_str(), charset.as_str())),
            _ => None,
        })
    }

    /// Whether the part's content type marks an html body.
    fn is_html(&self) -> bool {
        matches!(self.content_type(), Some(("text/html", _)))
    }

    /// Encode the part: each header line, a blank line, then the body.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for header in &self.headers {
            out.push_str(&header.encode());
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.encode_body());
        out
    }

    /// Transfer-encode the body: Base64 for html parts and for non-ASCII
    /// text, verbatim otherwise.
    fn encode_body(&self) -> String {
        if self.is_html() || !self.body.is_ascii() {
            encoding::encode_base64(&self.body)
        } else {
            self.body.clone()
        }
    }

    /// Transfer-decode a stored body.
    ///
    /// Bodies starting with the Base64 spelling of `<html>` are decoded;
    /// everything else passes through unchanged.
    pub fn decode_body(raw: &str) -> Result<String> {
        if raw.is_empty() {
            return Err(MailError::EmptyInput("part body"));
        }
        if raw.starts_with(HTML_BASE64_PREFIX) {
            encoding::decode_base64(raw)
        } else {
            Ok(raw.to_string())
        }
    }
}

/// One email message, singlepart or `multipart/alternative`.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    parts: Vec<Part>,
}

impl Message {
    /// Build a singlepart message.
    ///
    /// The content type follows the body: html bodies are
    /// `text/html; utf-8` with Base64 transfer encoding, ASCII text is
    /// `text/plain; us-ascii`, and any other text is `text/plain; utf-8`
    /// with Base64 transfer encoding.
    pub fn singlepart(
        sender: Address,
        recipients: Vec<Address>,
        subject: impl Into<String>,
        date: DateTime<FixedOffset>,
        body: impl Into<String>,
        body_is_html: bool,
    ) -> Result<Self> {
        let body = body.into();
        let mut headers = vec![
            Header::Sender(sender),
            Header::recipients(recipients)?,
            Header::Subject(subject.into()),
            Header::Date(date),
        ];
        headers.extend(content_headers(&body, body_is_html));
        Ok(Self {
            parts: vec![Part::new(headers, body)?],
        })
    }

    /// Build a `multipart/alternative` message from a text body and an
    /// html body, both required non-empty.
    pub fn multipart(
        sender: Address,
        recipients: Vec<Address>,
        subject: impl Into<String>,
        date: DateTime<FixedOffset>,
        text_body: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Result<Self> {
        let text_body = text_body.into();
        let html_body = html_body.into();

        let envelope_headers = vec![
            Header::Sender(sender),
            Header::recipients(recipients)?,
            Header::Subject(subject.into()),
            Header::Date(date),
            Header::MimeVersion("1.0".to_string()),
            Header::ContentType {
                media: "multipart/alternative".to_string(),
                charset: String::new(),
            },
        ];
        let envelope = Part::new(envelope_headers, MULTIPART_NOTICE.to_string())?;

        let text_part = Part::new(content_headers(&text_body, false), text_body)?;
        let html_part = Part::new(content_headers(&html_body, true), html_body)?;

        Ok(Self {
            parts: vec![envelope, text_part, html_part],
        })
    }

    /// Rebuild a message from the fragments of a stored entry.
    ///
    /// The four mandatory headers are collected by tag from any fragment;
    /// unknown tags are skipped. One fragment rebuilds a singlepart
    /// message (html when any part declared `text/html`); several rebuild
    /// a multipart message from the second and third bodies, the envelope
    /// body being the fixed notice.
    pub fn from_fragments(fragments: &[Fragment]) -> Result<Self> {
        let mut sender: Option<Address> = None;
        let mut recipients: Option<Vec<Address>> = None;
        let mut subject: Option<String> = None;
        let mut date: Option<DateTime<FixedOffset>> = None;
        let mut saw_html = false;
        let mut bodies = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            for (name, value) in fragment.raw_headers() {
                match Header::decode(name, value)? {
                    Some(Header::Sender(address)) => sender = Some(address),
                    Some(Header::Recipients(addresses)) => recipients = Some(addresses),
                    Some(Header::Subject(text)) => subject = Some(text),
                    Some(Header::Date(instant)) => date = Some(instant),
                    Some(Header::ContentType { media, .. }) => {
                        saw_html |= media == "text/html";
                    }
                    Some(_) | None => {}
                }
            }
            bodies.push(Part::decode_body(fragment.raw_body())?);
        }

        let sender = sender.ok_or(MailError::MissingHeader("From"))?;
        let recipients = recipients.ok_or(MailError::MissingHeader("To"))?;
        let subject = subject.ok_or(MailError::MissingHeader("Subject"))?;
        let date = date.ok_or(MailError::MissingHeader("Date"))?;

        if bodies.len() != 1 {
            let mut bodies = bodies.into_iter().skip(1);
            let text_body = bodies
                .next()
                .ok_or_else(|| MailError::MalformedBody("multipart entry lacks a text part".into()))?;
            let html_body = bodies
                .next()
                .ok_or_else(|| MailError::MalformedBody("multipart entry lacks an html part".into()))?;
            Self::multipart(sender, recipients, subject, date, text_body, html_body)
        } else {
            let body = bodies.into_iter().next().unwrap_or_default();
            Self::singlepart(sender, recipients, subject, date, body, saw_html)
        }
    }

    /// Whether the message is `multipart/alternative`.
    pub fn is_multipart(&self) -> bool {
        self.parts.len() != 1
    }

    /// The message's parts, in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Encode the message to its stored text form.
    ///
    /// Singlepart messages are the single encoded part; multipart
    /// messages join their parts with `--frontier` delimiter lines and a
    /// closing `--frontier--`.
    pub fn encode(&self) -> String {
        if !self.is_multipart() {
            return self.parts[0].encode();
        }
        let mut out = String::new();
        for part in &self.parts[..self.parts.len() - 1] {
            out.push_str(&part.encode());
            out.push_str("\n--frontier\n");
        }
        out.push_str(&self.parts[self.parts.len() - 1].encode());
        out.push_str("\n--frontier--\n");
        out
    }

    /// The sender, scanned from the first part.
    pub fn sender(&self) -> Result<&Address> {
        self.parts[0]
            .headers()
            .iter()
            .find_map(|header| match header {
                Header::Sender(address) => Some(address),
                _ => None,
            })
            .ok_or(MailError::MissingHeader("From"))
    }

    /// The recipients, scanned from the first part.
    pub fn recipients(&self) -> Result<&[Address]> {
        self.parts[0]
            .headers()
            .iter()
            .find_map(|header| match header {
                Header::Recipients(addresses) => Some(addresses.as_slice()),
                _ => None,
            })
            .ok_or(MailError::MissingHeader("To"))
    }

    /// The subject, scanned from the first part.
    pub fn subject(&self) -> Result<&str> {
        self.parts[0]
            .headers()
            .iter()
            .find_map(|header| match header {
                Header::Subject(text) => Some(text.as_str()),
                _ => None,
            })
            .ok_or(MailError::MissingHeader("Subject"))
    }

    /// The send date, scanned from the first part.
    pub fn date(&self) -> Result<DateTime<FixedOffset>> {
        self.sent_at().ok_or(MailError::MissingHeader("Date"))
    }

    /// Sort key: the send date if present. Messages from the public
    /// constructors always have one.
    pub(crate) fn sent_at(&self) -> Option<DateTime<FixedOffset>> {
        self.parts[0].headers().iter().find_map(|header| match header {
            Header::Date(instant) => Some(*instant),
            _ => None,
        })
    }
}

/// Content headers for a body: the type/charset pair, plus the Base64
/// transfer-encoding line whenever the body will not be stored verbatim.
fn content_headers(body: &str, body_is_html: bool) -> Vec<Header> {
    if body_is_html {
        vec![
            Header::ContentType {
                media: "text/html".to_string(),
                charset: "utf-8".to_string(),
            },
            Header::ContentTransferEncoding("base64".to_string()),
        ]
    } else if body.is_ascii() {
        vec![Header::ContentType {
            media: "text/plain".to_string(),
            charset: "us-ascii".to_string(),
        }]
    } else {
        vec![
            Header::ContentType {
                media: "text/plain".to_string(),
                charset: "utf-8".to_string(),
            },
            Header::ContentTransferEncoding("base64".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::entry;
    use chrono::{FixedOffset, TimeZone};

    fn sample_date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap()
    }

    fn sender() -> Address {
        Address::bare("a", "b").unwrap()
    }

    fn recipients() -> Vec<Address> {
        vec![Address::bare("c", "d").unwrap()]
    }

    #[test]
    fn test_singlepart_ascii_encoding() {
        let message = Message::singlepart(
            sender(),
            recipients(),
            "hi",
            sample_date(),
            "hello\n",
            false,
        )
        .unwrap();
        let encoded = message.encode();
        assert!(encoded.starts_with("From: a@b\nTo: c@d\nSubject: hi\nDate: "));
        assert!(encoded.contains("\nContent-Type: text/plain; charset=\"us-ascii\"\n\nhello\n"));
        assert!(!encoded.contains("Content-Transfer-Encoding"));
    }

    #[test]
    fn test_singlepart_non_ascii_body_is_base64() {
        let message = Message::singlepart(
            sender(),
            recipients(),
            "ciào",
            sample_date(),
            "cìao mondo\n",
            false,
        )
        .unwrap();
        let encoded = message.encode();
        assert!(encoded.contains("Subject: =?utf-8?B?Y2nDoG8=?="));
        assert!(encoded.contains("Content-Type: text/plain; charset=\"utf-8\""));
        assert!(encoded.contains("Content-Transfer-Encoding: base64"));
        // Body after the blank line is base64, not the raw text.
        let body = encoded.split_once("\n\n").unwrap().1;
        assert!(!body.contains("cìao"));
        assert_eq!(encoding::decode_base64(body).unwrap(), "cìao mondo\n");
    }

    #[test]
    fn test_singlepart_html_always_base64() {
        let message = Message::singlepart(
            sender(),
            recipients(),
            "hi",
            sample_date(),
            "<html>x</html>",
            true,
        )
        .unwrap();
        let encoded = message.encode();
        assert!(encoded.contains("Content-Type: text/html; charset=\"utf-8\""));
        assert!(encoded.contains("Content-Transfer-Encoding: base64"));
        let body = encoded.split_once("\n\n").unwrap().1;
        assert!(body.starts_with("PGh0bWw+"));
    }

    #[test]
    fn test_multipart_layout() {
        let message = Message::multipart(
            sender(),
            recipients(),
            "hi",
            sample_date(),
            "t",
            "<html>x</html>",
        )
        .unwrap();
        assert!(message.is_multipart());
        assert_eq!(message.parts().len(), 3);
        assert_eq!(message.parts()[0].body(), MULTIPART_NOTICE);

        let encoded = message.encode();
        assert_eq!(encoded.matches("\n--frontier\n").count(), 2);
        assert!(encoded.ends_with("\n--frontier--\n"));
        assert!(encoded.contains("MIME-Version: 1.0"));
        assert!(encoded.contains("Content-Type: multipart/alternative; boundary=frontier"));
    }

    #[test]
    fn test_empty_bodies_rejected() {
        assert!(
            Message::singlepart(sender(), recipients(), "s", sample_date(), "", false).is_err()
        );
        assert!(
            Message::multipart(sender(), recipients(), "s", sample_date(), "", "<html></html>")
                .is_err()
        );
        assert!(
            Message::multipart(sender(), recipients(), "s", sample_date(), "t", "").is_err()
        );
    }

    #[test]
    fn test_roundtrip_singlepart_ascii() {
        let message = Message::singlepart(
            sender(),
            recipients(),
            "hi",
            sample_date(),
            "hello\n",
            false,
        )
        .unwrap();
        let reparsed = Message::from_fragments(&entry::decode(&message.encode())).unwrap();
        assert_eq!(reparsed, message);
    }

    #[test]
    fn test_roundtrip_singlepart_html() {
        let message = Message::singlepart(
            sender(),
            recipients(),
            "hi",
            sample_date(),
            "<html><b>x</b></html>",
            true,
        )
        .unwrap();
        let reparsed = Message::from_fragments(&entry::decode(&message.encode())).unwrap();
        assert_eq!(reparsed, message);
    }

    #[test]
    fn test_roundtrip_multipart() {
        let message = Message::multipart(
            sender(),
            recipients(),
            "hi",
            sample_date(),
            "t",
            "<html>x</html>",
        )
        .unwrap();
        let reparsed = Message::from_fragments(&entry::decode(&message.encode())).unwrap();
        assert_eq!(reparsed, message);
    }

    #[test]
    fn test_accessors() {
        let message = Message::singlepart(
            Address::new("Alice Rossi", "alice", "example.com").unwrap(),
            recipients(),
            "hi",
            sample_date(),
            "hello",
            false,
        )
        .unwrap();
        assert_eq!(message.sender().unwrap().email(), "alice@example.com");
        assert_eq!(message.recipients().unwrap().len(), 1);
        assert_eq!(message.subject().unwrap(), "hi");
        assert_eq!(message.date().unwrap(), sample_date());
    }

    #[test]
    fn test_from_fragments_missing_header() {
        let fragments = entry::decode("From: a@b\nTo: c@d\nSubject: hi\n\nbody");
        let err = Message::from_fragments(&fragments).unwrap_err();
        assert!(matches!(err, MailError::MissingHeader("Date")));
    }

    #[test]
    fn test_from_fragments_ignores_unknown_headers() {
        let entry_text = "From: a@b\nX-Mailer: something\nTo: c@d\nSubject: hi\n\
                          Date: Tue, 2 Jan 2024 03:04:05 +0000\n\nbody";
        let message = Message::from_fragments(&entry::decode(entry_text)).unwrap();
        assert_eq!(message.subject().unwrap(), "hi");
        assert!(!message.is_multipart());
    }

    #[test]
    fn test_decode_body_heuristic() {
        // Base64 of "<html>…" is decoded…
        let encoded = encoding::encode_base64("<html>x</html>");
        assert_eq!(Part::decode_body(&encoded).unwrap(), "<html>x</html>");
        // …anything else passes through, even if it happens to be base64.
        assert_eq!(Part::decode_body("aGVsbG8=").unwrap(), "aGVsbG8=");
        assert!(Part::decode_body("").is_err());
    }
}
