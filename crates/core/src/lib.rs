//! Core types and traits for rankblend
//!
//! This crate defines the foundational pieces shared by the fusion engine
//! and the evaluation harness:
//! - DocId, Document: document identity and resolved attributes
//! - Candidate, CandidateList: one backend's ordered output
//! - Alpha: validated fusion weight
//! - RelevanceJudgment: ground truth for one query
//! - Error: BlendError / ProviderError taxonomy
//! - Traits: ResultProvider, DocumentStore
//! - Config: BlendConfig loaded from `rankblend.toml`
//! - InMemoryDocumentStore: JSON-lines backed store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use config::{BlendConfig, TuningConfig, CONFIG_FILE_NAME};
pub use error::{BlendError, ProviderError, Result};
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentStore, ResultProvider};
pub use types::{Alpha, Backend, Candidate, CandidateList, DocId, Document, RelevanceJudgment};
