//! API error types and JSON response formatting.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::backend::BackendError;
use crate::key::KeyError;
use crate::resolve::ResolveError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details in the response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Table not found error.
    pub fn table_not_found(table: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "TABLE_NOT_FOUND",
            format!("Table '{}' not found", table),
        )
        .with_details(serde_json::json!({ "table": table }))
    }

    /// No item under a well-formed key.
    pub fn item_not_found(table: &str, key: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "ITEM_NOT_FOUND",
            format!("No item with key '{}' in table '{}'", key, table),
        )
        .with_details(serde_json::json!({ "table": table, "key": key }))
    }

    /// Key token that does not decode against the table's schema.
    pub fn malformed_key(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "MALFORMED_KEY", message)
    }

    /// Scanned row whose key cannot be encoded.
    pub fn inconsistent_row(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "INCONSISTENT_ROW", message)
    }

    /// Storage backend call failed.
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "BACKEND_UNAVAILABLE", message)
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, message = %self.message, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match &err {
            BackendError::TableNotFound(table) => Self::table_not_found(table),
            BackendError::Rejected(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "BACKEND_REJECTED", msg.clone())
            }
            BackendError::Unavailable(_) => Self::backend_unavailable(err.to_string()),
            BackendError::InvalidResponse(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "INVALID_BACKEND_RESPONSE", err.to_string())
            }
        }
    }
}

impl From<KeyError> for ApiError {
    fn from(err: KeyError) -> Self {
        match &err {
            KeyError::MalformedToken { .. } => Self::malformed_key(err.to_string()),
            // Any other key error here comes from data the backend handed back
            _ => Self::inconsistent_row(err.to_string()),
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Key(e) => e.into(),
            ResolveError::Backend(e) => e.into(),
        }
    }
}
