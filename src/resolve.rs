//! Item resolution flow.
//!
//! Ties the key codec to a [`StorageBackend`]: scan rows get the token that
//! addresses them, and a token coming back from a link is turned into a
//! point lookup against the table's current key schema. The schema is
//! described again on every call; nothing is cached between requests.

use serde::Serialize;
use thiserror::Error;

use crate::backend::{BackendError, Item, StorageBackend, key_of};
use crate::key::{self, KeyError, KeySchema, KeyToken};
use crate::logging::{debug, trace};

/// A scan row paired with the token that addresses it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRow {
    pub key: KeyToken,
    pub item: Item,
}

/// Outcome of a point lookup that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Item),
    NotFound,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn into_item(self) -> Option<Item> {
        match self {
            Lookup::Found(item) => Some(item),
            Lookup::NotFound => None,
        }
    }
}

/// Errors from resolving a token to an item.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Attach a token to every row, keeping scan order.
///
/// A row without a well-typed key attribute fails the whole call.
pub fn annotate(rows: Vec<Item>, schema: &KeySchema) -> Result<Vec<AnnotatedRow>, KeyError> {
    rows.into_iter()
        .map(|item| {
            let key = key::encode(&key_of(&item, schema)?, schema)?;
            Ok(AnnotatedRow { key, item })
        })
        .collect()
}

/// Look up the item a token addresses in `table`.
pub async fn resolve_item<B>(backend: &B, table: &str, token: &str) -> Result<Lookup, ResolveError>
where
    B: StorageBackend + ?Sized,
{
    let description = backend.describe_table(table).await?;
    let key = key::decode(token, &description.key_schema)?;
    trace!(table = table, token = token, "decoded key token");

    let lookup = match backend.get_item(table, &key).await? {
        Some(item) => Lookup::Found(item),
        None => Lookup::NotFound,
    };
    debug!(table = table, found = lookup.is_found(), "resolved item");
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ItemValue, MemoryBackend, TableDescription};
    use crate::key::{PrimaryKey, ScalarType};

    fn order(pk: &str, sk: i64, total: i64) -> Item {
        Item::from([
            ("pk".to_string(), ItemValue::from(pk)),
            ("sk".to_string(), ItemValue::from(sk)),
            ("total".to_string(), ItemValue::from(total)),
        ])
    }

    fn orders_schema() -> KeySchema {
        KeySchema::composite("pk", ScalarType::String, "sk", ScalarType::Number).unwrap()
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new().with_table(
            TableDescription::new("Orders", orders_schema()),
            vec![order("user#1", 2, 10), order("user#1", 1, 20), order("user#2", 1, 30)],
        )
    }

    #[test]
    fn test_annotate_preserves_order() {
        let rows = vec![order("c", 1, 0), order("a", 1, 0), order("b", 1, 0)];
        let annotated = annotate(rows.clone(), &orders_schema()).unwrap();

        let items: Vec<_> = annotated.iter().map(|r| r.item.clone()).collect();
        assert_eq!(items, rows);

        let mut tokens: Vec<_> = annotated.iter().map(|r| r.key.as_str()).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_annotate_fails_on_missing_key_attribute() {
        let mut broken = order("a", 1, 0);
        broken.remove("sk");
        let err = annotate(vec![order("b", 1, 0), broken], &orders_schema()).unwrap_err();
        assert_eq!(err, KeyError::MissingAttribute("sk".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_annotated_row() {
        let backend = backend();
        let rows = backend.scan("Orders").await.unwrap();
        let annotated = annotate(rows, &orders_schema()).unwrap();

        for row in annotated {
            let lookup = resolve_item(&backend, "Orders", row.key.as_str()).await.unwrap();
            assert_eq!(lookup, Lookup::Found(row.item));
        }
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let key = PrimaryKey::new().with("pk", "nobody").with("sk", 9i64);
        let token = key::encode(&key, &orders_schema()).unwrap();

        let lookup = resolve_item(&backend(), "Orders", token.as_str()).await.unwrap();
        assert_eq!(lookup, Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_malformed_token() {
        let err = resolve_item(&backend(), "Orders", "Suser%231").await.unwrap_err();
        assert!(matches!(err, ResolveError::Key(ref e) if e.is_malformed_token()));
    }

    #[tokio::test]
    async fn test_resolve_forwards_backend_errors() {
        let err = resolve_item(&backend(), "Missing", "Sa~N1").await.unwrap_err();
        assert_eq!(
            err,
            ResolveError::Backend(BackendError::TableNotFound("Missing".to_string()))
        );

        let offline = MemoryBackend::offline("down");
        let err = resolve_item(&offline, "Orders", "Sa~N1").await.unwrap_err();
        assert!(matches!(err, ResolveError::Backend(BackendError::Unavailable(_))));
    }
}
