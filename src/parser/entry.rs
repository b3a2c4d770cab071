//! Entry codec: splits a stored entry's text into per-part fragments.
//!
//! A fragment is the raw view of one MIME part: an ordered list of
//! `(lowercased_name, value)` header pairs and the body text that follows
//! the first blank line. Multipart entries are split on the `--frontier`
//! delimiter lines emitted by the message encoder.

/// Delimiter between the parts of a multipart entry.
const BOUNDARY: &str = "\n--frontier\n";

/// Terminator after the last part of a multipart entry.
const TERMINATOR: &str = "\n--frontier--\n";

/// Raw parsed view of one MIME part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    raw_headers: Vec<(String, String)>,
    raw_body: String,
}

impl Fragment {
    /// Ordered `(lowercased_name, value)` header pairs.
    pub fn raw_headers(&self) -> &[(String, String)] {
        &self.raw_headers
    }

    /// The body text, exactly as stored.
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }
}

/// Decode an entry's text into its ordered fragments.
///
/// A singlepart entry yields one fragment; a multipart entry yields one
/// per `--frontier`-delimited block. The split is purely structural and
/// never fails; empty or header-less blocks surface as fragments with no
/// headers or an empty body, which the message layer rejects.
pub fn decode(entry: &str) -> Vec<Fragment> {
    let trimmed = entry.strip_suffix(TERMINATOR).unwrap_or(entry);
    trimmed.split(BOUNDARY).map(decode_block).collect()
}

/// Parse one header-block-plus-body section.
fn decode_block(block: &str) -> Fragment {
    let (header_text, raw_body) = match block.split_once("\n\n") {
        Some((headers, body)) => (headers, body.to_string()),
        None => (block, String::new()),
    };
    Fragment {
        raw_headers: unfold_headers(header_text),
        raw_body,
    }
}

/// Unfold the header block into `(lowercase_name, value)` pairs.
///
/// A line opening with space or tab continues the previous header's
/// value; a line with no colon is neither and gets dropped.
fn unfold_headers(text: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        headers.push((name.trim().to_lowercase(), value.trim().to_string()));
    }

    headers
}
