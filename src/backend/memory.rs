//! In-process backend over fixed tables.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::key::PrimaryKey;
use crate::logging::{debug, trace};

use super::error::BackendError;
use super::item::{Item, key_of};
use super::{StorageBackend, TableDescription};

#[derive(Debug, Clone)]
struct MemoryTable {
    description: TableDescription,
    rows: Vec<Item>,
}

/// Backend holding tables built up front.
///
/// Rows are returned by `scan` in insertion order. The contents never change
/// once the backend is shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: BTreeMap<String, MemoryTable>,
    offline: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails as unavailable.
    pub fn offline(message: impl Into<String>) -> Self {
        Self {
            tables: BTreeMap::new(),
            offline: Some(message.into()),
        }
    }

    /// Add a table with its rows.
    ///
    /// The description's item count is set from the rows.
    pub fn with_table(mut self, mut description: TableDescription, rows: Vec<Item>) -> Self {
        description.item_count = i64::try_from(rows.len()).ok();
        self.tables
            .insert(description.name.clone(), MemoryTable { description, rows });
        self
    }

    fn check_online(&self) -> Result<(), BackendError> {
        match &self.offline {
            Some(message) => Err(BackendError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn table(&self, name: &str) -> Result<&MemoryTable, BackendError> {
        self.check_online()?;
        self.tables
            .get(name)
            .ok_or_else(|| BackendError::TableNotFound(name.to_string()))
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        self.check_online()?;
        Ok(self.tables.keys().cloned().collect())
    }

    async fn describe_table(&self, table: &str) -> Result<TableDescription, BackendError> {
        Ok(self.table(table)?.description.clone())
    }

    async fn scan(&self, table: &str) -> Result<Vec<Item>, BackendError> {
        let rows = self.table(table)?.rows.clone();
        debug!(table = table, rows = rows.len(), "memory scan");
        Ok(rows)
    }

    async fn get_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Item>, BackendError> {
        let entry = self.table(table)?;
        key.conforms_to(&entry.description.key_schema)
            .map_err(|e| BackendError::Rejected(e.to_string()))?;

        trace!(table = table, "memory point lookup");
        Ok(entry
            .rows
            .iter()
            .find(|row| key_of(row, &entry.description.key_schema).ok().as_ref() == Some(key))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ItemValue;
    use crate::key::{KeySchema, ScalarType};

    fn backend() -> MemoryBackend {
        let schema = KeySchema::partition_only("id", ScalarType::String);
        let rows = vec![
            Item::from([("id".to_string(), ItemValue::from("b"))]),
            Item::from([("id".to_string(), ItemValue::from("a"))]),
        ];
        MemoryBackend::new().with_table(TableDescription::new("Things", schema), rows)
    }

    #[tokio::test]
    async fn test_scan_keeps_insertion_order() {
        let rows = backend().scan("Things").await.unwrap();
        let ids: Vec<_> = rows.iter().filter_map(|r| r.get("id")).collect();
        assert_eq!(ids, vec![&ItemValue::from("b"), &ItemValue::from("a")]);
    }

    #[tokio::test]
    async fn test_describe_sets_item_count() {
        let description = backend().describe_table("Things").await.unwrap();
        assert_eq!(description.item_count, Some(2));
    }

    #[tokio::test]
    async fn test_get_item() {
        let backend = backend();
        let found = backend
            .get_item("Things", &PrimaryKey::new().with("id", "a"))
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = backend
            .get_item("Things", &PrimaryKey::new().with("id", "zzz"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_item_rejects_wrong_key_shape() {
        let err = backend()
            .get_item("Things", &PrimaryKey::new().with("id", 1i64))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let err = backend().scan("Nope").await.unwrap_err();
        assert!(err.is_table_not_found());
    }

    #[tokio::test]
    async fn test_offline_backend() {
        let err = MemoryBackend::offline("connection refused")
            .list_tables()
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::Unavailable("connection refused".to_string()));
    }
}
