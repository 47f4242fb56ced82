//! Core data model
//!
//! This module defines the types that flow between the backends, the
//! fusion engine and the evaluation harness:
//! - DocId: stable document identifier
//! - Document: resolved document attributes
//! - Backend: which retrieval backend produced a list
//! - Candidate / CandidateList: one backend's ordered output for one query
//! - Alpha: validated fusion weight
//! - RelevanceJudgment: ground truth for one query

use crate::error::{BlendError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// DocId
// ============================================================================

/// Stable document identifier
///
/// The core never owns documents; it only passes identifiers around and
/// asks the [`DocumentStore`](crate::traits::DocumentStore) to resolve them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Create a new identifier
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        DocId(s.to_string())
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        DocId(s)
    }
}

// ============================================================================
// Document
// ============================================================================

/// A document as known to the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier
    pub id: DocId,
    /// Title
    pub title: String,
    /// Abstract / body text
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl Document {
    /// Create a new document
    pub fn new(
        id: impl Into<DocId>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Document {
            id: id.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
        }
    }
}

// ============================================================================
// Backend
// ============================================================================

/// The two retrieval backends blended by the fusion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Full-text keyword engine
    Lexical,
    /// Embedding-similarity engine
    Semantic,
}

impl Backend {
    /// Lowercase name for logs and output
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Lexical => "lexical",
            Backend::Semantic => "semantic",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CandidateList
// ============================================================================

/// One entry of a backend's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Document identifier
    pub id: DocId,
    /// Backend-local relevance signal; opaque to the fusion engine
    pub score: f64,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(id: impl Into<DocId>, score: f64) -> Self {
        Candidate {
            id: id.into(),
            score,
        }
    }
}

/// Ordered output of one backend for one query
///
/// Ordered by backend relevance descending. The provider, not the core,
/// is responsible for that order; fusion only looks at positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
}

impl CandidateList {
    /// Wrap an already ordered list of candidates
    pub fn new(candidates: Vec<Candidate>) -> Self {
        CandidateList { candidates }
    }

    /// Create an empty list
    pub fn empty() -> Self {
        CandidateList::default()
    }

    /// Build a list from identifiers in rank order
    ///
    /// Scores are synthesized as descending integers; only order matters
    /// downstream.
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<DocId>,
    {
        let ids: Vec<DocId> = ids.into_iter().map(Into::into).collect();
        let n = ids.len();
        let candidates = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| Candidate::new(id, (n - i) as f64))
            .collect();
        CandidateList { candidates }
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if the backend returned nothing
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Identifiers in rank order
    pub fn ids(&self) -> impl Iterator<Item = &DocId> {
        self.candidates.iter().map(|c| &c.id)
    }

    /// Keep at most `limit` candidates
    pub fn truncate(&mut self, limit: usize) {
        self.candidates.truncate(limit);
    }

    /// Order by backend score descending; equal scores keep their order
    pub fn sort_by_score(&mut self) {
        self.candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

// ============================================================================
// Alpha
// ============================================================================

/// Fusion weight in [0, 1]
///
/// 1.0 is pure lexical, 0.0 pure semantic. Out-of-range values are
/// rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Alpha(f64);

impl Alpha {
    /// Pure semantic ranking
    pub const SEMANTIC_ONLY: Alpha = Alpha(0.0);
    /// Even blend
    pub const BALANCED: Alpha = Alpha(0.5);
    /// Pure lexical ranking
    pub const LEXICAL_ONLY: Alpha = Alpha(1.0);

    /// Validate and wrap a fusion weight
    ///
    /// # Errors
    ///
    /// Returns `InvalidAlpha` if the value is NaN, infinite or outside [0, 1].
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Alpha(value))
        } else {
            Err(BlendError::InvalidAlpha(value))
        }
    }

    /// Lexical weight
    pub fn get(self) -> f64 {
        self.0
    }

    /// Semantic weight, `1 - alpha`
    pub fn complement(self) -> f64 {
        1.0 - self.0
    }
}

impl Default for Alpha {
    fn default() -> Self {
        Alpha::BALANCED
    }
}

impl TryFrom<f64> for Alpha {
    type Error = BlendError;

    fn try_from(value: f64) -> Result<Self> {
        Alpha::new(value)
    }
}

impl From<Alpha> for f64 {
    fn from(alpha: Alpha) -> f64 {
        alpha.0
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ============================================================================
// RelevanceJudgment
// ============================================================================

/// Ground truth for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceJudgment {
    /// Query text as sent to both backends
    pub query: String,
    /// Identifiers judged relevant
    pub relevant: HashSet<DocId>,
}

impl RelevanceJudgment {
    /// Create a new judgment
    pub fn new<I, T>(query: impl Into<String>, relevant: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<DocId>,
    {
        RelevanceJudgment {
            query: query.into(),
            relevant: relevant.into_iter().map(Into::into).collect(),
        }
    }

    /// True if `id` was judged relevant
    pub fn is_relevant(&self, id: &DocId) -> bool {
        self.relevant.contains(id)
    }
}

// ============================================================================
// Tests
// ============================================================================
