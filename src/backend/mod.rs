//! Storage backend seam.
//!
//! The browsing flow only needs four read calls from the backend. They are
//! collected in [`StorageBackend`] so the server can run against the AWS SDK
//! client ([`DynamoBackend`], `dynamo` feature) or an in-process
//! [`MemoryBackend`].

#[cfg(feature = "dynamo")]
mod dynamo;
mod error;
mod item;
mod memory;

use async_trait::async_trait;
use serde::Serialize;

use crate::key::{KeySchema, PrimaryKey, ScalarType};

#[cfg(feature = "dynamo")]
pub use dynamo::{DynamoBackend, DynamoConfig};
pub use error::BackendError;
pub use item::{Item, ItemValue, item_from_key, key_of};
pub use memory::MemoryBackend;

/// Read-only operations of a DynamoDB-compatible store.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Names of every table.
    async fn list_tables(&self) -> Result<Vec<String>, BackendError>;

    /// Current description of one table, including its key schema.
    async fn describe_table(&self, table: &str) -> Result<TableDescription, BackendError>;

    /// Rows of a table in backend order (first page only).
    async fn scan(&self, table: &str) -> Result<Vec<Item>, BackendError>;

    /// Point lookup by exact primary key.
    async fn get_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Item>, BackendError>;
}

/// A declared attribute type from the table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: ScalarType,
}

/// Table schema and metadata as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescription {
    pub name: String,
    pub key_schema: KeySchema,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub status: Option<String>,
    pub item_count: Option<i64>,
    pub size_bytes: Option<i64>,
    /// RFC 3339 creation time.
    pub created_at: Option<String>,
    pub arn: Option<String>,
    pub global_secondary_indexes: Vec<String>,
    pub local_secondary_indexes: Vec<String>,
    pub read_capacity: Option<i64>,
    pub write_capacity: Option<i64>,
}

impl TableDescription {
    /// Description with only a name and key schema; other metadata empty.
    pub fn new(name: impl Into<String>, key_schema: KeySchema) -> Self {
        let attribute_definitions = key_schema
            .iter()
            .map(|a| AttributeDefinition {
                name: a.name.clone(),
                attr_type: a.attr_type,
            })
            .collect();

        Self {
            name: name.into(),
            key_schema,
            attribute_definitions,
            status: None,
            item_count: None,
            size_bytes: None,
            created_at: None,
            arn: None,
            global_secondary_indexes: Vec::new(),
            local_secondary_indexes: Vec::new(),
            read_capacity: None,
            write_capacity: None,
        }
    }
}
