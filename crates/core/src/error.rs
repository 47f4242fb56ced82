//! Error types for rankblend
//!
//! This module defines the error taxonomy shared by the fusion engine and
//! the evaluation harness. We use `thiserror` for automatic `Display` and
//! `Error` trait implementations.
//!
//! Two enums live here:
//! - [`BlendError`]: everything a caller of the core can see
//! - [`ProviderError`]: what a backend reports; the fusion engine downgrades
//!   a single provider failure and only surfaces it when both backends fail

use crate::types::{Backend, DocId};
use std::io;
use thiserror::Error;

/// Result type alias for rankblend operations
pub type Result<T> = std::result::Result<T, BlendError>;

/// Error types for rankblend
#[derive(Debug, Error)]
pub enum BlendError {
    /// One backend failed; callers normally only see this in logs
    #[error("{backend} provider unavailable: {reason}")]
    ProviderUnavailable {
        /// Which backend failed
        backend: Backend,
        /// Failure reported by the provider
        reason: ProviderError,
    },

    /// Both backends failed for the same query
    #[error("all providers failed (lexical: {lexical}; semantic: {semantic})")]
    AllProvidersFailed {
        /// Failure reported by the lexical provider
        lexical: ProviderError,
        /// Failure reported by the semantic provider
        semantic: ProviderError,
    },

    /// Identifier not present in the document store
    #[error("document not found: {0}")]
    DocumentNotFound(DocId),

    /// Fusion weight outside [0, 1] or not finite
    #[error("invalid fusion weight {0}: must be within [0, 1]")]
    InvalidAlpha(f64),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (reading documents, runs, judgments, config)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed input file
    #[error("parse error: {0}")]
    Parse(String),
}

impl BlendError {
    /// Build an `InvalidConfig` error from anything printable
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        BlendError::InvalidConfig(msg.into())
    }

    /// Build a `Parse` error from anything printable
    pub fn parse(msg: impl Into<String>) -> Self {
        BlendError::Parse(msg.into())
    }
}

impl From<serde_json::Error> for BlendError {
    fn from(e: serde_json::Error) -> Self {
        BlendError::Parse(e.to_string())
    }
}

/// Failure reported by a [`ResultProvider`](crate::traits::ResultProvider)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Backend unreachable (connection refused, index missing, ...)
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer in time
    #[error("request timed out")]
    Timeout,

    /// Backend answered with something that could not be interpreted
    #[error("malformed response: {0}")]
    Malformed(String),
}
