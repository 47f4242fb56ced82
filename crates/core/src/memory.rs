//! In-memory document store
//!
//! Holds the corpus as a `HashMap<DocId, Document>`. Loaded from a
//! JSON-lines file with one `{"id", "title", "abstract"}` object per line.

use crate::error::{BlendError, Result};
use crate::traits::DocumentStore;
use crate::types::{DocId, Document};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// `DocumentStore` backed by a hash map
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    docs: HashMap<DocId, Document>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any previous one with the same id
    pub fn insert(&mut self, doc: Document) {
        self.docs.insert(doc.id.clone(), doc);
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True if the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Load a JSON-lines corpus file.
    ///
    /// Blank lines are skipped. A duplicate id keeps the last record and
    /// logs a warning.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Parse` (with the line
    /// number) for a malformed record.
    pub fn from_jsonl(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut store = Self::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let doc: Document = serde_json::from_str(&line).map_err(|e| {
                BlendError::parse(format!("{}:{}: {}", path.display(), lineno + 1, e))
            })?;
            if store.docs.contains_key(&doc.id) {
                warn!(target: "rankblend::store", id = %doc.id, "Duplicate document id, keeping last");
            }
            store.insert(doc);
        }
        info!(target: "rankblend::store", path = %path.display(), documents = store.len(), "Loaded corpus");
        Ok(store)
    }
}

impl FromIterator<Document> for InMemoryDocumentStore {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut store = Self::new();
        for doc in iter {
            store.insert(doc);
        }
        store
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn resolve(&self, id: &DocId) -> Result<Document> {
        self.docs
            .get(id)
            .cloned()
            .ok_or_else(|| BlendError::DocumentNotFound(id.clone()))
    }
}
