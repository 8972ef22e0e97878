//! Error types for the key codec.

use thiserror::Error;

use super::types::ScalarType;

/// Errors that can occur while building schemas, encoding keys or decoding tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Malformed key token: {reason}")]
    MalformedToken { reason: String },

    #[error("Key attribute missing: {0}")]
    MissingAttribute(String),

    #[error("Attribute is not part of the key schema: {0}")]
    UnexpectedAttribute(String),

    #[error("Type mismatch for key attribute '{name}': expected {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: ScalarType,
        got: String,
    },

    #[error("Invalid key schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

impl KeyError {
    /// Create a malformed token error from a reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error came from decoding a token.
    pub fn is_malformed_token(&self) -> bool {
        matches!(self, Self::MalformedToken { .. })
    }
}
