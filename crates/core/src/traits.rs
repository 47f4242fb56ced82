//! Backend abstractions
//!
//! This module defines the two seams the core talks through. Both are
//! implemented outside the core (full-text index, embedding index, corpus
//! store); the fusion engine works with any implementation.
//!
//! Thread safety: implementations are shared across the provider fan-out
//! and across evaluation workers, so both traits require `Send + Sync`.

use crate::error::{ProviderError, Result};
use crate::types::{CandidateList, DocId, Document};

/// A retrieval backend
///
/// Implemented twice: once by the lexical engine and once by the semantic
/// engine. The trait is object-safe for use as `Arc<dyn ResultProvider>`.
pub trait ResultProvider: Send + Sync {
    /// Return at most `limit` candidates for `query`, best first.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the backend is unreachable, times
    /// out or answers with garbage. The fusion engine treats that as an
    /// empty list unless the other backend fails too.
    fn search(&self, query: &str, limit: usize) -> std::result::Result<CandidateList, ProviderError>;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

/// Source of document attributes
pub trait DocumentStore: Send + Sync {
    /// Resolve an identifier to its title and abstract.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if the identifier is unknown.
    fn resolve(&self, id: &DocId) -> Result<Document>;
}
