//! Replay of recorded backend output
//!
//! `RecordedProvider` answers from a run file captured from a real backend:
//! a JSON object mapping each query string to its ordered candidates.
//!
//! ```json
//! {
//!   "quantum computing applications": [
//!     {"id": "1234", "score": 12.7},
//!     {"id": "5678", "score": 9.1}
//!   ]
//! }
//! ```
//!
//! Lists are re-sorted by score on load so the replayed output is ordered
//! the way a live backend would return it.

use rankblend_core::{BlendError, CandidateList, ProviderError, Result, ResultProvider};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// `ResultProvider` that replays recorded runs
#[derive(Debug, Clone, Default)]
pub struct RecordedProvider {
    name: String,
    runs: HashMap<String, CandidateList>,
}

impl RecordedProvider {
    /// Create an empty provider
    pub fn new(name: impl Into<String>) -> Self {
        RecordedProvider {
            name: name.into(),
            runs: HashMap::new(),
        }
    }

    /// Record the output for one query
    pub fn insert(&mut self, query: impl Into<String>, mut list: CandidateList) {
        list.sort_by_score();
        self.runs.insert(query.into(), list);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_run(mut self, query: impl Into<String>, list: CandidateList) -> Self {
        self.insert(query, list);
        self
    }

    /// Number of recorded queries
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Load a run file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Parse` if it is not a
    /// query-to-candidates object.
    pub fn from_json_file(name: impl Into<String>, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let runs: HashMap<String, CandidateList> = serde_json::from_str(&content)
            .map_err(|e| BlendError::parse(format!("{}: {}", path.display(), e)))?;

        let mut provider = RecordedProvider::new(name);
        for (query, list) in runs {
            provider.insert(query, list);
        }
        info!(
            target: "rankblend::fusion",
            provider = %provider.name,
            path = %path.display(),
            queries = provider.len(),
            "Loaded recorded run"
        );
        Ok(provider)
    }
}

impl ResultProvider for RecordedProvider {
    fn search(&self, query: &str, limit: usize) -> std::result::Result<CandidateList, ProviderError> {
        let mut list = match self.runs.get(query) {
            Some(list) => list.clone(),
            None => {
                debug!(target: "rankblend::fusion", provider = %self.name, query, "No recorded run for query");
                return Ok(CandidateList::empty());
            }
        };
        list.truncate(limit);
        Ok(list)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
