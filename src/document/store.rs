//! Open-document registry

use std::collections::HashMap;
use std::sync::Arc;

use tower_lsp::lsp_types::Url;
use tracing::debug;

/// An open document as last reported by the editor
#[derive(Debug)]
struct Document {
    text: Arc<str>,
    version: i32,
    /// Identifies the open/close cycle this entry belongs to
    open_id: u64,
}

/// Immutable view of a document taken when a revalidation is triggered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub uri: Url,
    pub text: Arc<str>,
    pub version: i32,
    open_id: u64,
}

/// Registry of open documents, keyed by URI.
///
/// Entries are created by `open`, replaced wholesale by `change` and
/// removed by `close`. Every open starts a new open-session, so a snapshot
/// taken before a close never matches a document reopened under the same URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<Url, Document>,
    next_open_id: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a newly opened document, replacing any entry with the same URI.
    pub fn open(&mut self, uri: Url, text: String, version: i32) -> DocumentSnapshot {
        self.next_open_id += 1;
        let document = Document {
            text: Arc::from(text),
            version,
            open_id: self.next_open_id,
        };
        let snapshot = Self::snapshot_of(&uri, &document);
        if self.documents.insert(uri, document).is_some() {
            debug!("Document {} reopened without close", snapshot.uri);
        }
        snapshot
    }

    /// Replaces the full text of an open document.
    ///
    /// Returns `None` when the document is not open.
    pub fn change(&mut self, uri: &Url, text: String, version: i32) -> Option<DocumentSnapshot> {
        let document = self.documents.get_mut(uri)?;
        document.text = Arc::from(text);
        document.version = version;
        Some(Self::snapshot_of(uri, document))
    }

    /// Removes a document. Returns whether it was open.
    pub fn close(&mut self, uri: &Url) -> bool {
        self.documents.remove(uri).is_some()
    }

    pub fn snapshot(&self, uri: &Url) -> Option<DocumentSnapshot> {
        self.documents
            .get(uri)
            .map(|document| Self::snapshot_of(uri, document))
    }

    /// Snapshots of every open document
    pub fn snapshots(&self) -> Vec<DocumentSnapshot> {
        self.documents
            .iter()
            .map(|(uri, document)| Self::snapshot_of(uri, document))
            .collect()
    }

    /// True while the snapshot's document is still open in the same
    /// open-session and has not been changed since.
    pub fn is_current(&self, snapshot: &DocumentSnapshot) -> bool {
        self.documents.get(&snapshot.uri).is_some_and(|document| {
            document.open_id == snapshot.open_id && document.version == snapshot.version
        })
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn snapshot_of(uri: &Url, document: &Document) -> DocumentSnapshot {
        DocumentSnapshot {
            uri: uri.clone(),
            text: Arc::clone(&document.text),
            version: document.version,
            open_id: document.open_id,
        }
    }
}
