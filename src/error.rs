//! Centralized error types for mailshell.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailshell library.
#[derive(Error, Debug)]
pub enum MailError {
    /// A required value was empty.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// An address (or address list) failed to decode.
    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    /// A date header value failed to parse as RFC 5322.
    #[error("Malformed date: {0}")]
    MalformedDate(String),

    /// A header raw value failed its grammar.
    #[error("Malformed {header} header: {value}")]
    MalformedHeader { header: &'static str, value: String },

    /// A body failed transfer decoding.
    #[error("Malformed body: {0}")]
    MalformedBody(String),

    /// The first part of a message lacks a mandatory header.
    #[error("Missing mandatory header: {0}")]
    MissingHeader(&'static str),

    /// An operation needed a selected mailbox while none was selected.
    #[error("No mailbox selected")]
    NoSelection,

    /// The selected mailbox name resolves to no folder on disk.
    #[error("No mailbox named '{0}'")]
    NoSuchMailbox(String),

    /// A 1-based index fell outside `[1, count]`.
    #[error("Index {index} out of range [1, {count}]")]
    OutOfRange { index: usize, count: usize },

    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for `Result<T, MailError>`.
pub type Result<T> = std::result::Result<T, MailError>;

impl MailError {
    /// Wrap an `io::Error` together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Io { path, source }
    }
}

/// Fallback conversion for `?` in places with no meaningful path; code
/// touching the filesystem attaches the real one via [`MailError::io`].
impl From<std::io::Error> for MailError {
    fn from(source: std::io::Error) -> Self {
        MailError::io("<unknown>", source)
    }
}
