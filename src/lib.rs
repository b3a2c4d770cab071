//! `mailshell` — a terminal mail user agent over a plain-text message store.
//!
//! This crate provides the core library: the typed message model with its
//! MIME codec, mailboxes materialised from a directory tree, and the
//! agent that keeps the in-memory model and the on-disk store consistent.

pub mod config;
pub mod error;
pub mod mailbox;
pub mod model;
pub mod mua;
pub mod parser;
pub mod render;
pub mod store;
