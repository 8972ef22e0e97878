//! Unified error type for the dynamo-browse library.
//!
//! This module provides a single [`Error`] type that encompasses all errors
//! that can occur in the library, making it easier to handle errors in
//! application code.

use thiserror::Error;

use crate::backend::BackendError;
use crate::key::KeyError;
use crate::resolve::ResolveError;

/// Unified error type for all dynamo-browse operations.
///
/// # Example
///
/// ```ignore
/// use dynamo_browse::{Result, StorageBackend, annotate};
///
/// async fn linked_rows(backend: &dyn StorageBackend, table: &str) -> Result<usize> {
///     let description = backend.describe_table(table).await?;
///     let rows = annotate(backend.scan(table).await?, &description.key_schema)?;
///     Ok(rows.len())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Key schema, key or token error.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Storage backend error.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Key(e) => Self::Key(e),
            ResolveError::Backend(e) => Self::Backend(e),
        }
    }
}

impl Error {
    /// Returns `true` if this is a key codec error.
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// Returns `true` if this is a malformed token.
    pub fn is_malformed_token(&self) -> bool {
        matches!(self, Self::Key(e) if e.is_malformed_token())
    }

    /// Returns `true` if this is a storage backend error.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_conversion() {
        let err: Error = ResolveError::Key(KeyError::malformed("bad")).into();
        assert!(err.is_key());
        assert!(err.is_malformed_token());

        let err: Error = ResolveError::Backend(BackendError::Unavailable("down".into())).into();
        assert!(err.is_backend());
        assert!(!err.is_malformed_token());
    }
}
