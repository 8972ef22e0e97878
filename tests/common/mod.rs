//! Common test utilities and fixtures.
//!
//! Builds an in-memory backend with a few representative tables so the
//! router can be driven end to end without a running DynamoDB.

#![cfg(feature = "server")]
#![allow(dead_code)]

use axum_test::TestServer;
use dynamo_browse::backend::{Item, ItemValue, MemoryBackend, TableDescription};
use dynamo_browse::key::{KeySchema, ScalarType};
use dynamo_browse::server::{AppState, router};

// =============================================================================
// Fixture Tables
// =============================================================================

/// Composite key table: `pk` string, `sk` number.
pub const ORDERS: &str = "Orders";

/// Partition-only table keyed by a string that contains path characters.
pub const FILES: &str = "Files";

/// Partition-only table keyed by binary.
pub const BLOBS: &str = "Blobs";

/// Table with a row missing its sort key.
pub const BROKEN: &str = "Broken";

/// Build a row from attribute pairs.
pub fn row(pairs: Vec<(&str, ItemValue)>) -> Item {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub fn orders_schema() -> KeySchema {
    KeySchema::composite("pk", ScalarType::String, "sk", ScalarType::Number)
        .expect("valid schema")
}

/// Orders rows in scan order.
pub fn order_rows() -> Vec<Item> {
    vec![
        row(vec![("pk", "user#1".into()), ("sk", 42i64.into()), ("total", 10i64.into())]),
        row(vec![("pk", "user#1".into()), ("sk", 7i64.into()), ("total", 20i64.into())]),
        row(vec![("pk", "user~2".into()), ("sk", 1i64.into()), ("paid", true.into())]),
    ]
}

pub fn backend() -> MemoryBackend {
    MemoryBackend::new()
        .with_table(TableDescription::new(ORDERS, orders_schema()), order_rows())
        .with_table(
            TableDescription::new(FILES, KeySchema::partition_only("path", ScalarType::String)),
            vec![
                row(vec![("path", "a/b".into()), ("size", 3i64.into())]),
                row(vec![("path", "docs/read me?.txt".into()), ("size", 5i64.into())]),
            ],
        )
        .with_table(
            TableDescription::new(BLOBS, KeySchema::partition_only("id", ScalarType::Binary)),
            vec![row(vec![("id", ItemValue::Binary(vec![0, 255, 126])), ("note", "bin".into())])],
        )
        .with_table(
            TableDescription::new(BROKEN, orders_schema()),
            vec![
                row(vec![("pk", "ok".into()), ("sk", 1i64.into())]),
                row(vec![("pk", "no-sort-key".into())]),
            ],
        )
}

// =============================================================================
// Test Application
// =============================================================================

/// Test application wrapper around the router.
pub struct TestApp {
    pub server: TestServer,
}

impl TestApp {
    /// Router over the fixture tables.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_backend(backend())
    }

    /// Router over a given backend.
    pub fn with_backend(backend: MemoryBackend) -> anyhow::Result<Self> {
        let server = TestServer::new(router(AppState::new(backend)))?;
        Ok(Self { server })
    }

    /// Fetch a table view and return the key tokens in row order.
    pub async fn tokens(&self, table: &str) -> Vec<String> {
        let body: serde_json::Value = self
            .server
            .get(&format!("/api/v1/tables/{}", table))
            .await
            .json();
        body["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item["key"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Assert that an error response carries the expected code.
pub fn assert_error_code(body: &serde_json::Value, code: &str) {
    assert_eq!(
        body["error"]["code"].as_str(),
        Some(code),
        "unexpected error body: {}",
        body
    );
}
