//! Wire-text parsing: address tokenizing, transfer encodings, and the
//! entry-to-fragment codec.

pub mod address;
pub mod encoding;
pub mod entry;
