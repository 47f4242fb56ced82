//! Evaluation and tuning for rankblend
//!
//! This crate provides:
//! - metrics: average precision, nDCG@K, mean
//! - load_judgments: relevance judgment files
//! - Evaluator: MAP / mean nDCG of a HybridSearch at a given α
//! - optimize: grid search for the α with the highest MAP
//!
//! # Usage
//!
//! ```ignore
//! use rankblend_eval::{optimize, AlphaGrid, EvalSettings, Evaluator};
//!
//! let evaluator = Evaluator::new(&hybrid, EvalSettings::default());
//! let outcome = optimize(&evaluator, &judgments, &AlphaGrid::new(0.1, 1.0, 0.1)?)?;
//! println!("best α = {}", outcome.best_alpha);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod harness;
pub mod judgments;
pub mod metrics;
pub mod tuning;

pub use harness::{EvalReport, EvalSettings, Evaluator, QueryScore};
pub use judgments::load_judgments;
pub use metrics::{average_precision, mean, ndcg_at_k};
pub use tuning::{optimize, optimize_with, AlphaGrid, SweepPoint, TuningOutcome, MAX_GRID_POINTS};
