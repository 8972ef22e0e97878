//! Table listing, description and scan handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use futures_util::future::try_join_all;
use serde::Serialize;

use crate::backend::{Item, TableDescription};
use crate::resolve::{AnnotatedRow, annotate};

use super::super::{error::ApiError, state::AppState};

/// Every table with its description.
#[derive(Debug, Serialize)]
pub struct TableListResponse {
    pub tables: Vec<TableDescription>,
}

/// A table and its scanned rows, each carrying the token that links to it.
#[derive(Debug, Serialize)]
pub struct TableViewResponse {
    pub table: TableDescription,
    pub count: usize,
    pub items: Vec<AnnotatedRow>,
}

/// A table and its raw scanned rows.
#[derive(Debug, Serialize)]
pub struct TableMetaResponse {
    pub table: TableDescription,
    pub count: usize,
    pub items: Vec<Item>,
}

/// List all tables, describing them concurrently.
pub async fn list_tables(State(state): State<AppState>) -> Result<Json<TableListResponse>, ApiError> {
    let backend = state.backend();
    let names = backend.list_tables().await?;

    let tables = try_join_all(names.iter().map(|name| backend.describe_table(name))).await?;

    Ok(Json(TableListResponse { tables }))
}

/// Describe a table and scan it, linking every row by key.
pub async fn table_view(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<TableViewResponse>, ApiError> {
    let backend = state.backend();
    let (description, rows) =
        tokio::try_join!(backend.describe_table(&table), backend.scan(&table))?;

    let items = annotate(rows, &description.key_schema)?;

    Ok(Json(TableViewResponse {
        table: description,
        count: items.len(),
        items,
    }))
}

/// Describe a table and scan it without annotating rows.
pub async fn table_meta(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<TableMetaResponse>, ApiError> {
    let backend = state.backend();
    let (description, items) =
        tokio::try_join!(backend.describe_table(&table), backend.scan(&table))?;

    Ok(Json(TableMetaResponse {
        table: description,
        count: items.len(),
        items,
    }))
}
