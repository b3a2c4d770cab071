//! Address tokenizing (RFC 5322 §3.4).
//!
//! Splits a header value into `(display_name, local, domain)` triples.
//! Validation of the parts themselves happens in [`crate::model::address`].

/// Characters allowed in the local and domain parts of an address.
///
/// Alphanumerics, dot, underscore and hyphen; dots may not lead, trail,
/// or repeat.
pub fn is_valid_address_part(s: &str) -> bool {
    if s.is_empty() || !s.is_ascii() {
        return false;
    }
    if s.starts_with('.') || s.ends_with('.') || s.contains("..") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}

/// Tokenize a comma-separated address list into
/// `(display_name, local, domain)` triples.
///
/// Supported per-address forms:
/// - `"user@domain"`
/// - `"<user@domain>"`
/// - `"Display Name <user@domain>"`
/// - `"\"Display, Name\" <user@domain>"`
///
/// Commas inside quotes or angle brackets do not split. A token that lacks
/// an `@` yields a triple with an empty domain, which the caller rejects.
pub fn decode(raw: &str) -> Vec<(String, String, String)> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_angle = false;

    for ch in raw.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '<' if !in_quotes => {
                in_angle = true;
                current.push(ch);
            }
            '>' if !in_quotes => {
                in_angle = false;
                current.push(ch);
            }
            ',' if !in_quotes && !in_angle => {
                if !current.trim().is_empty() {
                    result.push(decode_one(&current));
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        result.push(decode_one(&current));
    }

    result
}

/// Tokenize a single address into a `(display_name, local, domain)` triple.
fn decode_one(raw: &str) -> (String, String, String) {
    let trimmed = raw.trim();

    // "Display Name <address>" or "<address>"
    if let Some(angle_start) = trimmed.rfind('<') {
        if let Some(angle_end) = trimmed.rfind('>') {
            if angle_end > angle_start {
                let addr = trimmed[angle_start + 1..angle_end].trim();
                let display_name = strip_quotes(&trimmed[..angle_start]);
                let (local, domain) = split_at_sign(addr);
                return (display_name, local, domain);
            }
        }
    }

    // Bare address: "user@domain"
    let (local, domain) = split_at_sign(trimmed);
    (String::new(), local, domain)
}

/// Split `local@domain`; no `@` leaves the domain empty.
fn split_at_sign(addr: &str) -> (String, String) {
    match addr.split_once('@') {
        Some((local, domain)) => (local.to_string(), domain.to_string()),
        None => (addr.to_string(), String::new()),
    }
}

/// Strip surrounding double-quotes and trim whitespace.
fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}
