//! Error types for the search core
//!
//! Ingestion-time validation failures are recoverable (the offending record
//! is skipped); everything else aborts the operation and leaves the prior
//! committed state intact.

use thiserror::Error;

/// Result type for core search and maintenance operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors produced by the search core
#[derive(Debug, Error)]
pub enum SearchError {
    /// Malformed or missing-required-field document
    #[error("invalid document: {0}")]
    Validation(String),

    /// Lookup targeting an unknown document
    #[error("not found: {0}")]
    NotFound(String),

    /// Structurally invalid query reaching the index layer
    #[error("invalid query: {0}")]
    Query(String),

    /// Internal invariant violation; must never surface through a
    /// successfully returned result
    #[error("index inconsistency: {0}")]
    IndexInconsistency(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
