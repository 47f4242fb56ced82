//! Hybrid search orchestrator
//!
//! This module provides:
//! - HybridSearch: fans a query out to both backends, fuses, resolves
//! - SearchResponse / SearchHit / SearchStats: what a search returns
//! - ResultRecord: the `{id, title, abstract, score}` payload served to
//!   the outside world
//!
//! HybridSearch is STATELESS. It holds only `Arc` references to the
//! backends; the fusion weight is passed with every call.
//!
//! With a provider timeout set, each backend call runs on its own worker
//! thread and a call that misses the deadline counts as
//! `ProviderError::Timeout`. The worker is detached and finishes on its own.

use crate::fuser::{FusedHit, Fuser, PositionFuser};
use rankblend_core::{
    Alpha, Backend, BlendError, CandidateList, DocId, DocumentStore, ProviderError, Result,
    ResultProvider,
};
use serde::Serialize;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Default ratio of candidates requested per backend to results returned.
pub const DEFAULT_CANDIDATE_MULTIPLIER: usize = 2;

type ProviderResult = std::result::Result<CandidateList, ProviderError>;

// ============================================================================
// Response types
// ============================================================================

/// One resolved result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Document identifier
    pub id: DocId,
    /// Document title
    pub title: String,
    /// Document abstract
    pub abstract_text: String,
    /// Fused score (higher = more relevant)
    pub score: f64,
    /// Rank in the result set (1-indexed)
    pub rank: u32,
    /// Rank in the lexical list (1-indexed), if present there
    pub lexical_rank: Option<u32>,
    /// Rank in the semantic list (1-indexed), if present there
    pub semantic_rank: Option<u32>,
}

/// Execution statistics for one search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Time spent in search (microseconds)
    pub elapsed_micros: u64,
    /// Candidates returned by the lexical backend
    pub lexical_candidates: usize,
    /// Candidates returned by the semantic backend
    pub semantic_candidates: usize,
    /// Backend whose failure was downgraded to an empty list
    pub degraded: Option<Backend>,
    /// Fused identifiers the document store could not resolve
    pub unresolved: Vec<DocId>,
}

/// Search results plus execution metadata
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    /// Ranked hits (highest score first)
    pub hits: Vec<SearchHit>,
    /// True if fusion produced more than `top_k` documents
    pub truncated: bool,
    /// Execution statistics
    pub stats: SearchStats,
}

impl SearchResponse {
    /// Check if response has no hits
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Get number of hits
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Identifiers in rank order
    pub fn ids(&self) -> Vec<DocId> {
        self.hits.iter().map(|h| h.id.clone()).collect()
    }

    /// Serializable payload: ordered `{id, title, abstract, score}` records
    pub fn to_records(&self) -> Vec<ResultRecord> {
        self.hits
            .iter()
            .map(|h| ResultRecord {
                id: h.id.clone(),
                title: h.title.clone(),
                abstract_text: h.abstract_text.clone(),
                score: h.score,
            })
            .collect()
    }
}

/// Wire shape of one search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    /// Document identifier
    pub id: DocId,
    /// Document title
    pub title: String,
    /// Document abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Fused score
    pub score: f64,
}

/// Both candidate lists for one query
#[derive(Debug, Clone, Default)]
pub struct Retrieved {
    /// Lexical candidates (empty if that backend failed)
    pub lexical: CandidateList,
    /// Semantic candidates (empty if that backend failed)
    pub semantic: CandidateList,
    /// Backend whose failure was downgraded
    pub degraded: Option<Backend>,
}

// ============================================================================
// HybridSearch
// ============================================================================

/// Lexical + semantic search orchestrator
///
/// ```text
///            query, alpha, top_k
///                    │
///         ┌──────────┴──────────┐   rayon::join
///         ▼                     ▼
///   ┌──────────┐         ┌──────────┐
///   │ lexical  │         │ semantic │
///   └────┬─────┘         └────┬─────┘
///        └──────────┬─────────┘
///                   ▼
///              ┌─────────┐
///              │  Fuser  │
///              └────┬────┘
///                   ▼
///           ┌───────────────┐
///           │ DocumentStore │
///           └───────┬───────┘
///                   ▼
///            SearchResponse
/// ```
#[derive(Clone)]
pub struct HybridSearch {
    lexical: Arc<dyn ResultProvider>,
    semantic: Arc<dyn ResultProvider>,
    store: Arc<dyn DocumentStore>,
    fuser: Arc<dyn Fuser>,
    candidate_multiplier: usize,
    provider_timeout: Option<Duration>,
}

impl HybridSearch {
    /// Create a new orchestrator
    ///
    /// Uses PositionFuser and requests `2 * top_k` candidates per backend.
    pub fn new(
        lexical: Arc<dyn ResultProvider>,
        semantic: Arc<dyn ResultProvider>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        HybridSearch {
            lexical,
            semantic,
            store,
            fuser: Arc::new(PositionFuser),
            candidate_multiplier: DEFAULT_CANDIDATE_MULTIPLIER,
            provider_timeout: None,
        }
    }

    /// Builder: set custom fuser
    pub fn with_fuser(mut self, fuser: Arc<dyn Fuser>) -> Self {
        self.fuser = fuser;
        self
    }

    /// Builder: set how many candidates per result each backend is asked for
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero multiplier.
    pub fn with_candidate_multiplier(mut self, multiplier: usize) -> Result<Self> {
        if multiplier == 0 {
            return Err(BlendError::invalid_config(
                "candidate_multiplier must be at least 1",
            ));
        }
        self.candidate_multiplier = multiplier;
        Ok(self)
    }

    /// Current candidate multiplier
    pub fn candidate_multiplier(&self) -> usize {
        self.candidate_multiplier
    }

    /// Builder: bound how long each backend call may take
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero duration.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(BlendError::invalid_config(
                "provider timeout must be greater than zero",
            ));
        }
        self.provider_timeout = Some(timeout);
        Ok(self)
    }

    /// Current per-backend time limit, if any
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout
    }

    // ========================================================================
    // Search Orchestration
    // ========================================================================

    /// Search both backends and return the fused, resolved top `top_k`.
    ///
    /// # Flow
    ///
    /// 1. Query both backends in parallel
    /// 2. Downgrade a single failure to an empty list
    /// 3. Fuse under `alpha`
    /// 4. Resolve identifiers, skipping unknown ones
    ///
    /// # Errors
    ///
    /// Returns `AllProvidersFailed` if both backends fail. Unknown
    /// identifiers are not errors; they are logged and listed in
    /// `stats.unresolved`.
    pub fn search(&self, query: &str, alpha: Alpha, top_k: usize) -> Result<SearchResponse> {
        let start = Instant::now();

        if top_k == 0 {
            return Ok(SearchResponse::default());
        }

        let limit = top_k.saturating_mul(self.candidate_multiplier);
        let retrieved = self.retrieve(query, limit)?;

        let fused = self
            .fuser
            .fuse(&retrieved.lexical, &retrieved.semantic, alpha, top_k);
        debug!(
            target: "rankblend::fusion",
            fuser = self.fuser.name(),
            %alpha,
            lexical = retrieved.lexical.len(),
            semantic = retrieved.semantic.len(),
            fused = fused.hits.len(),
            "Fused candidate lists"
        );

        let (hits, unresolved) = self.resolve(fused.hits);

        let stats = SearchStats {
            elapsed_micros: start.elapsed().as_micros() as u64,
            lexical_candidates: retrieved.lexical.len(),
            semantic_candidates: retrieved.semantic.len(),
            degraded: retrieved.degraded,
            unresolved,
        };

        Ok(SearchResponse {
            hits,
            truncated: fused.truncated,
            stats,
        })
    }

    /// Fetch up to `limit` candidates from both backends concurrently.
    ///
    /// A call that exceeds the provider timeout is treated like any other
    /// provider failure.
    ///
    /// # Errors
    ///
    /// Returns `AllProvidersFailed` only when both calls fail.
    pub fn retrieve(&self, query: &str, limit: usize) -> Result<Retrieved> {
        let (lexical, semantic) = match self.provider_timeout {
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                let lexical = spawn_call(&self.lexical, query, limit);
                let semantic = spawn_call(&self.semantic, query, limit);
                (await_call(lexical, deadline), await_call(semantic, deadline))
            }
            None => rayon::join(
                || self.lexical.search(query, limit),
                || self.semantic.search(query, limit),
            ),
        };

        match (lexical, semantic) {
            (Ok(lexical), Ok(semantic)) => Ok(Retrieved {
                lexical: capped(lexical, limit),
                semantic: capped(semantic, limit),
                degraded: None,
            }),
            (Ok(lexical), Err(e)) => {
                self.log_degraded(Backend::Semantic, e);
                Ok(Retrieved {
                    lexical: capped(lexical, limit),
                    semantic: CandidateList::empty(),
                    degraded: Some(Backend::Semantic),
                })
            }
            (Err(e), Ok(semantic)) => {
                self.log_degraded(Backend::Lexical, e);
                Ok(Retrieved {
                    lexical: CandidateList::empty(),
                    semantic: capped(semantic, limit),
                    degraded: Some(Backend::Lexical),
                })
            }
            (Err(lexical), Err(semantic)) => {
                let err = BlendError::AllProvidersFailed { lexical, semantic };
                error!(target: "rankblend::fusion", query, error = %err, "Search failed");
                Err(err)
            }
        }
    }

    fn log_degraded(&self, backend: Backend, reason: ProviderError) {
        let provider = match backend {
            Backend::Lexical => self.lexical.name(),
            Backend::Semantic => self.semantic.name(),
        };
        let err = BlendError::ProviderUnavailable { backend, reason };
        warn!(
            target: "rankblend::fusion",
            provider,
            error = %err,
            "Provider failed, ranking with the other backend only"
        );
    }

    /// Resolve fused hits against the store, dropping unknown identifiers.
    fn resolve(&self, fused: Vec<FusedHit>) -> (Vec<SearchHit>, Vec<DocId>) {
        let mut hits = Vec::with_capacity(fused.len());
        let mut unresolved = Vec::new();

        for hit in fused {
            match self.store.resolve(&hit.id) {
                Ok(doc) => hits.push(SearchHit {
                    rank: (hits.len() + 1) as u32,
                    id: hit.id,
                    title: doc.title,
                    abstract_text: doc.abstract_text,
                    score: hit.score,
                    lexical_rank: hit.lexical_rank,
                    semantic_rank: hit.semantic_rank,
                }),
                Err(e) => {
                    warn!(
                        target: "rankblend::fusion",
                        id = %hit.id,
                        error = %e,
                        "Skipping result the document store cannot resolve"
                    );
                    unresolved.push(hit.id);
                }
            }
        }

        (hits, unresolved)
    }
}

/// Start one provider call on a dedicated thread.
fn spawn_call(
    provider: &Arc<dyn ResultProvider>,
    query: &str,
    limit: usize,
) -> std::result::Result<mpsc::Receiver<ProviderResult>, ProviderError> {
    let (tx, rx) = mpsc::channel();
    let provider = Arc::clone(provider);
    let query = query.to_string();
    thread::Builder::new()
        .name(format!("rankblend-{}", provider.name()))
        .spawn(move || {
            // The receiver is gone if the caller already timed out
            let _ = tx.send(provider.search(&query, limit));
        })
        .map(|_| rx)
        .map_err(|e| ProviderError::Unavailable(format!("failed to start provider call: {}", e)))
}

/// Wait for a spawned call until `deadline`.
fn await_call(
    pending: std::result::Result<mpsc::Receiver<ProviderResult>, ProviderError>,
    deadline: Instant,
) -> ProviderResult {
    let rx = pending?;
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(ProviderError::Timeout),
        Err(RecvTimeoutError::Disconnected) => Err(ProviderError::Unavailable(
            "provider call panicked".to_string(),
        )),
    }
}

fn capped(mut list: CandidateList, limit: usize) -> CandidateList {
    list.truncate(limit);
    list
}

// ============================================================================
// Tests
// ============================================================================
