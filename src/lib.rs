//! rankblend - lexical + semantic rank fusion with an evaluation harness
//!
//! rankblend merges the ranked output of a keyword engine and an embedding
//! engine by rank position, then measures and tunes the blend against
//! relevance judgments.
//!
//! # Quick Start
//!
//! ```ignore
//! use rankblend::{Alpha, HybridSearch, InMemoryDocumentStore, RecordedProvider};
//!
//! let hybrid = HybridSearch::new(lexical, semantic, store);
//! let response = hybrid.search("quantum computing applications", Alpha::BALANCED, 10)?;
//! for hit in &response.hits {
//!     println!("{} {:.3} {}", hit.rank, hit.score, hit.title);
//! }
//! ```
//!
//! # Architecture
//!
//! - `rankblend-core`: data model, errors, backend traits, config
//! - `rankblend-fusion`: position fusion and the search orchestrator
//! - `rankblend-eval`: MAP / nDCG, evaluation and weight tuning

pub use rankblend_core::*;
pub use rankblend_eval::*;
pub use rankblend_fusion::*;
