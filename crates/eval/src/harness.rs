//! Evaluation harness
//!
//! Runs every judged query through [`HybridSearch`] at one fusion weight
//! and aggregates per-query AP and nDCG into MAP and mean nDCG.
//!
//! ```text
//! judgments ──► HybridSearch::search(query, alpha, top_k) ──► ranked ids
//!                                                               │
//!               average_precision / ndcg_at_k ◄─────────────────┘
//!                              │
//!                           mean ──► EvalReport { map, ndcg }
//! ```
//!
//! The weight is an explicit argument of every evaluation; the harness
//! holds no mutable state and can be shared across threads.

use crate::metrics::{average_precision, mean, ndcg_at_k};
use rankblend_core::{Alpha, Backend, BlendConfig, RelevanceJudgment, Result};
use rankblend_fusion::HybridSearch;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

// ============================================================================
// Settings and reports
// ============================================================================

/// Evaluation depth and execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalSettings {
    /// Results requested per query; AP is computed over this many
    pub top_k: usize,
    /// Cutoff for nDCG
    pub ndcg_depth: usize,
    /// Evaluate queries on the rayon pool
    pub parallel: bool,
}

impl Default for EvalSettings {
    fn default() -> Self {
        EvalSettings {
            top_k: 10,
            ndcg_depth: 10,
            parallel: false,
        }
    }
}

impl From<&BlendConfig> for EvalSettings {
    fn from(config: &BlendConfig) -> Self {
        EvalSettings {
            top_k: config.top_k,
            ndcg_depth: config.tuning.ndcg_depth,
            parallel: config.tuning.parallel,
        }
    }
}

/// Metrics for one judged query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryScore {
    /// Query text
    pub query: String,
    /// Average precision of the fused ranking
    pub average_precision: f64,
    /// nDCG at the configured depth
    pub ndcg: f64,
    /// Number of documents returned
    pub retrieved: usize,
    /// Backend that failed for this query, if any
    pub degraded: Option<Backend>,
}

/// Aggregate metrics for one fusion weight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    /// Weight the queries were fused with
    pub alpha: Alpha,
    /// Mean average precision
    pub map: f64,
    /// Mean nDCG
    pub ndcg: f64,
    /// Per-query breakdown in judgment order
    pub per_query: Vec<QueryScore>,
}

impl EvalReport {
    /// Number of queries whose search ran on a single backend
    pub fn degraded_queries(&self) -> usize {
        self.per_query.iter().filter(|q| q.degraded.is_some()).count()
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Scores a [`HybridSearch`] against relevance judgments
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    search: &'a HybridSearch,
    settings: EvalSettings,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over a search pipeline
    pub fn new(search: &'a HybridSearch, settings: EvalSettings) -> Self {
        Evaluator { search, settings }
    }

    /// Current settings
    pub fn settings(&self) -> EvalSettings {
        self.settings
    }

    /// Evaluate every judgment at `alpha`.
    ///
    /// Per-query results keep judgment order whether or not the queries
    /// ran in parallel. An empty judgment set reports 0 for both metrics.
    ///
    /// # Errors
    ///
    /// Fails on the first query whose search fails (both backends down).
    pub fn evaluate(&self, judgments: &[RelevanceJudgment], alpha: Alpha) -> Result<EvalReport> {
        let start = Instant::now();

        let per_query: Vec<QueryScore> = if self.settings.parallel {
            judgments
                .par_iter()
                .map(|j| self.score_query(j, alpha))
                .collect::<Result<_>>()?
        } else {
            judgments
                .iter()
                .map(|j| self.score_query(j, alpha))
                .collect::<Result<_>>()?
        };

        let ap: Vec<f64> = per_query.iter().map(|q| q.average_precision).collect();
        let ndcg: Vec<f64> = per_query.iter().map(|q| q.ndcg).collect();
        let report = EvalReport {
            alpha,
            map: mean(&ap),
            ndcg: mean(&ndcg),
            per_query,
        };

        info!(
            target: "rankblend::eval",
            alpha = %alpha,
            queries = judgments.len(),
            map = report.map,
            ndcg = report.ndcg,
            degraded = report.degraded_queries(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Evaluated judgments"
        );
        Ok(report)
    }

    fn score_query(&self, judgment: &RelevanceJudgment, alpha: Alpha) -> Result<QueryScore> {
        let response = self
            .search
            .search(&judgment.query, alpha, self.settings.top_k)?;
        let retrieved = response.ids();

        let score = QueryScore {
            query: judgment.query.clone(),
            average_precision: average_precision(&judgment.relevant, &retrieved),
            ndcg: ndcg_at_k(&judgment.relevant, &retrieved, self.settings.ndcg_depth),
            retrieved: retrieved.len(),
            degraded: response.stats.degraded,
        };
        debug!(
            target: "rankblend::eval",
            query = %score.query,
            ap = score.average_precision,
            ndcg = score.ndcg,
            "Scored query"
        );
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankblend_core::{CandidateList, Document, InMemoryDocumentStore};
    use rankblend_fusion::RecordedProvider;
    use std::sync::Arc;

    fn pipeline() -> HybridSearch {
        let lexical = RecordedProvider::new("lexical")
            .with_run("quantum", CandidateList::from_ids(["1234", "5678", "9101"]))
            .with_run("climate", CandidateList::from_ids(["2222", "3333"]));
        let semantic = RecordedProvider::new("semantic")
            .with_run("quantum", CandidateList::from_ids(["1234", "5678", "9101"]))
            .with_run("climate", CandidateList::from_ids(["2222", "3333"]));
        let store: InMemoryDocumentStore = ["1234", "5678", "9101", "2222", "3333"]
            .iter()
            .map(|id| Document::new(*id, format!("Paper {id}"), ""))
            .collect();
        HybridSearch::new(Arc::new(lexical), Arc::new(semantic), Arc::new(store))
    }

    #[test]
    fn test_single_query_map() {
        let search = pipeline();
        let evaluator = Evaluator::new(&search, EvalSettings::default());
        let judgments = vec![RelevanceJudgment::new("quantum", ["5678"])];

        let report = evaluator.evaluate(&judgments, Alpha::BALANCED).unwrap();
        assert!((report.map - 0.5).abs() < 1e-12, "got {}", report.map);
        assert_eq!(report.per_query.len(), 1);
        assert_eq!(report.per_query[0].retrieved, 3);
        assert_eq!(report.alpha, Alpha::BALANCED);
    }

    #[test]
    fn test_mean_over_queries() {
        let search = pipeline();
        let evaluator = Evaluator::new(&search, EvalSettings::default());
        let judgments = vec![
            RelevanceJudgment::new("quantum", ["5678"]),  // AP 0.5
            RelevanceJudgment::new("climate", ["2222"]),  // AP 1.0
        ];

        let report = evaluator.evaluate(&judgments, Alpha::BALANCED).unwrap();
        assert!((report.map - 0.75).abs() < 1e-12);
        assert_eq!(report.per_query[0].query, "quantum");
        assert_eq!(report.per_query[1].query, "climate");
    }

    #[test]
    fn test_empty_judgments() {
        let search = pipeline();
        let evaluator = Evaluator::new(&search, EvalSettings::default());
        let report = evaluator.evaluate(&[], Alpha::BALANCED).unwrap();
        assert_eq!(report.map, 0.0);
        assert_eq!(report.ndcg, 0.0);
        assert!(report.per_query.is_empty());
    }

    #[test]
    fn test_unknown_query_scores_zero() {
        let search = pipeline();
        let evaluator = Evaluator::new(&search, EvalSettings::default());
        let judgments = vec![RelevanceJudgment::new("unjudged topic", ["1234"])];
        let report = evaluator.evaluate(&judgments, Alpha::BALANCED).unwrap();
        assert_eq!(report.map, 0.0);
        assert_eq!(report.per_query[0].retrieved, 0);
    }

    #[test]
    fn test_top_k_limits_retrieved() {
        let search = pipeline();
        let settings = EvalSettings {
            top_k: 1,
            ..EvalSettings::default()
        };
        let evaluator = Evaluator::new(&search, settings);
        let judgments = vec![RelevanceJudgment::new("quantum", ["5678"])];
        let report = evaluator.evaluate(&judgments, Alpha::BALANCED).unwrap();
        assert_eq!(report.per_query[0].retrieved, 1);
        assert_eq!(report.map, 0.0);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = BlendConfig::default();
        config.top_k = 25;
        config.tuning.ndcg_depth = 5;
        config.tuning.parallel = true;
        let settings = EvalSettings::from(&config);
        assert_eq!(settings.top_k, 25);
        assert_eq!(settings.ndcg_depth, 5);
        assert!(settings.parallel);

        let search = pipeline();
        let evaluator = Evaluator::new(&search, settings);
        assert_eq!(evaluator.settings(), settings);
    }
}
