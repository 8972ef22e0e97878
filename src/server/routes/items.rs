//! Single item handler.

use axum::{
    Json,
    extract::{OriginalUri, RawPathParams, State},
};
use serde::Serialize;

use crate::backend::Item;
use crate::resolve::{Lookup, resolve_item};

use super::super::{error::ApiError, state::AppState};

/// A resolved item.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub table: String,
    pub key: String,
    pub item: Item,
}

/// Decoded path parameter.
fn path_param<'a>(params: &'a RawPathParams, name: &str) -> Result<&'a str, ApiError> {
    params
        .iter()
        .find(|(param, _)| *param == name)
        .map(|(_, value)| value)
        .ok_or_else(|| ApiError::internal(format!("missing path parameter '{}'", name)))
}

/// Last path segment exactly as it appeared in the request.
///
/// The router percent-decodes captures, but key tokens carry their own
/// escaping and must reach the codec untouched.
fn raw_last_segment(uri: &OriginalUri) -> Result<&str, ApiError> {
    uri.path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| ApiError::malformed_key("empty key token"))
}

/// Resolve a key token to the item it addresses.
pub async fn get_item(
    State(state): State<AppState>,
    params: RawPathParams,
    uri: OriginalUri,
) -> Result<Json<ItemResponse>, ApiError> {
    let table = path_param(&params, "table")?.to_string();
    let key = raw_last_segment(&uri)?;

    match resolve_item(state.backend(), &table, key).await? {
        Lookup::Found(item) => Ok(Json(ItemResponse {
            table,
            key: key.to_string(),
            item,
        })),
        Lookup::NotFound => Err(ApiError::item_not_found(&table, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn test_raw_last_segment_keeps_escapes() {
        let uri = OriginalUri(Uri::from_static("/api/v1/tables/Orders/items/Suser%231~N42"));
        assert_eq!(raw_last_segment(&uri).unwrap(), "Suser%231~N42");

        let uri = OriginalUri(Uri::from_static("/api/v1/tables/Files/items/Sa%2Fb?pretty"));
        assert_eq!(raw_last_segment(&uri).unwrap(), "Sa%2Fb");
    }
}
