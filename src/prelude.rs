//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```ignore
//! use dynamo_browse::prelude::*;
//!
//! let schema = KeySchema::partition_only("id", ScalarType::String);
//! let token = key::encode(&PrimaryKey::new().with("id", "a/b"), &schema)?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Key codec
pub use crate::key::{
    self, AttributeValue, KeyAttribute, KeyError, KeyRole, KeySchema, KeyToken, Number,
    PrimaryKey, ScalarType,
};

// Storage backends
pub use crate::backend::{
    BackendError, Item, ItemValue, MemoryBackend, StorageBackend, TableDescription,
};
#[cfg(feature = "dynamo")]
pub use crate::backend::{DynamoBackend, DynamoConfig};

// Resolution flow
pub use crate::resolve::{AnnotatedRow, Lookup, ResolveError, annotate, resolve_item};
