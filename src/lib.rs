//! Read-only browsing console for DynamoDB-compatible tables.
//!
//! The library lists and describes tables, scans their rows and resolves a
//! single item from a URL-safe token that encodes its primary key.
//!
//! # Quick Start
//!
//! ```ignore
//! use dynamo_browse::prelude::*;
//!
//! let backend = DynamoBackend::connect(&DynamoConfig::default()).await;
//!
//! // Link every scanned row by its key token
//! let description = backend.describe_table("Orders").await?;
//! let rows = annotate(backend.scan("Orders").await?, &description.key_schema)?;
//!
//! // Follow a link back to the item
//! let lookup = resolve_item(&backend, "Orders", rows[0].key.as_str()).await?;
//! ```
//!
//! # Modules
//!
//! - [`key`] - Primary key <-> token codec (always available)
//! - [`backend`] - Storage backend trait, in-memory and AWS SDK implementations
//! - [`resolve`] - Row annotation and token resolution
//! - [`server`] - HTTP browsing API (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `dynamo` - Enable the AWS SDK backend (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `server` - Enable the HTTP server and its binary
//! - `full` - Enable all features

pub mod backend;
pub mod key;
mod logging;
pub mod prelude;
pub mod resolve;
#[cfg(feature = "server")]
pub mod server;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

pub use backend::{BackendError, Item, ItemValue, MemoryBackend, StorageBackend, TableDescription};
#[cfg(feature = "dynamo")]
pub use backend::{DynamoBackend, DynamoConfig};
pub use key::{AttributeValue, KeyError, KeySchema, KeyToken, PrimaryKey, ScalarType};
pub use resolve::{AnnotatedRow, Lookup, ResolveError, annotate, resolve_item};
