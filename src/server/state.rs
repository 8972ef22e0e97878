//! Application state management.

use std::sync::Arc;

use crate::backend::{DynamoBackend, DynamoConfig, StorageBackend};

/// Shared application state.
///
/// Holds only the backend handle; table schemas are fetched per request.
#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn StorageBackend>,
}

impl AppState {
    /// Create state around any backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Connect to the configured DynamoDB-compatible endpoint.
    pub async fn connect(config: &DynamoConfig) -> Self {
        Self::new(DynamoBackend::connect(config).await)
    }

    /// The storage backend.
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }
}
