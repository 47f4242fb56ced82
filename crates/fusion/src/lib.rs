//! Rank fusion for rankblend
//!
//! This crate provides:
//! - Fuser trait for pluggable fusion algorithms
//! - PositionFuser / fuse: linear blend of rank-position scores
//! - HybridSearch: parallel backend fan-out, fusion and resolution
//! - RecordedProvider: replays captured backend runs
//!
//! # Usage
//!
//! ```ignore
//! use rankblend_fusion::HybridSearch;
//!
//! let hybrid = HybridSearch::new(lexical, semantic, store);
//! let response = hybrid.search("quantum computing", Alpha::BALANCED, 10)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fuser;
pub mod hybrid;
pub mod recorded;

// Re-export commonly used types
pub use fuser::{fuse, position_score, FusedHit, FusedResult, Fuser, PositionFuser};
pub use hybrid::{
    HybridSearch, ResultRecord, Retrieved, SearchHit, SearchResponse, SearchStats,
    DEFAULT_CANDIDATE_MULTIPLIER,
};
pub use recorded::RecordedProvider;
