//! A minimal language server for plain text documents.
//!
//! The server tracks open documents, validates them against a pattern rule
//! using per-document settings pulled from the editor, and answers
//! completion requests.

pub mod config;
pub mod document;
pub mod log;
pub mod lsp;
pub mod rules;
pub mod settings;
