//! Error taxonomy for search and retrieval.
//!
//! Frontends map each variant to a distinct caller-visible condition:
//! validation problems are reported verbatim, missing documents as a
//! missing resource, and internal failures with a generic message.

use thiserror::Error;

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Malformed or missing request fields.
    #[error("{0}")]
    Validation(String),

    /// Unknown document id.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Unexpected failure while assembling a response.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SearchError {
    pub fn validation(message: impl Into<String>) -> Self {
        SearchError::Validation(message.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        SearchError::NotFound(id.into())
    }

    /// Wrap a store failure. The full chain is kept for logging.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        SearchError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for SearchError {
    fn from(err: anyhow::Error) -> Self {
        SearchError::Internal(format!("{:#}", err))
    }
}
