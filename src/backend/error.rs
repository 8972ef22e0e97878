//! Error types for storage backend calls.

use thiserror::Error;

/// Errors reported by a [`StorageBackend`](super::StorageBackend).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Request rejected by backend: {0}")]
    Rejected(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Returns `true` if the backend reported the table as missing.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_))
    }
}
