//! Document layer
//! - store.rs: Open-document registry (DocumentStore, DocumentSnapshot)
//! - line_index.rs: Byte offset to UTF-16 position mapping

pub mod line_index;
pub mod store;

pub use line_index::LineIndex;
pub use store::{DocumentSnapshot, DocumentStore};
