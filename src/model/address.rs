//! Email address value type.

use std::fmt;

use crate::error::{MailError, Result};
use crate::parser::address as tokenizer;

/// An immutable email address: an optional display name plus the
/// `local@domain` pair.
///
/// # Examples
/// - `"Juan García <juan@ejemplo.com>"` → `display_name = "Juan García"`,
///   `local = "juan"`, `domain = "ejemplo.com"`
/// - `"user@example.com"` → empty display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    display_name: String,
    local: String,
    domain: String,
}

impl Address {
    /// Build an address, validating that the local and domain parts are
    /// non-empty and match the address-part grammar.
    pub fn new(
        display_name: impl Into<String>,
        local: impl Into<String>,
        domain: impl Into<String>,
    ) -> Result<Self> {
        let display_name = display_name.into();
        let local = local.into();
        let domain = domain.into();
        if local.is_empty() {
            return Err(MailError::EmptyInput("address local part"));
        }
        if domain.is_empty() {
            return Err(MailError::EmptyInput("address domain"));
        }
        if !tokenizer::is_valid_address_part(&local) {
            return Err(MailError::MalformedAddress(format!(
                "invalid local part '{local}'"
            )));
        }
        if !tokenizer::is_valid_address_part(&domain) {
            return Err(MailError::MalformedAddress(format!(
                "invalid domain '{domain}'"
            )));
        }
        Ok(Self {
            display_name,
            local,
            domain,
        })
    }

    /// Build an address with no display name.
    pub fn bare(local: impl Into<String>, domain: impl Into<String>) -> Result<Self> {
        Self::new("", local, domain)
    }

    /// Decode a single encoded address (the first of the list if the text
    /// names several).
    pub fn decode(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(MailError::EmptyInput("address"));
        }
        let parts = tokenizer::decode(raw);
        let (display_name, local, domain) = parts
            .into_iter()
            .next()
            .ok_or_else(|| MailError::MalformedAddress(raw.to_string()))?;
        Self::new(display_name, local, domain)
            .map_err(|_| MailError::MalformedAddress(raw.to_string()))
    }

    /// The display name (may be empty).
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The local part.
    pub fn local(&self) -> &str {
        &self.local
    }

    /// The domain part.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The plain email, `local@domain`.
    pub fn email(&self) -> String {
        format!("{}@{}", self.local, self.domain)
    }
}

/// Canonical text form: bare email when there is no display name, the name
/// quoted when it runs past two words.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}@{}", self.local, self.domain)
        } else if self.display_name.split(' ').count() > 2 {
            write!(f, "\"{}\" <{}@{}>", self.display_name, self.local, self.domain)
        } else {
            write!(f, "{} <{}@{}>", self.display_name, self.local, self.domain)
        }
    }
}
