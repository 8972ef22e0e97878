//! API routes and handlers.

mod items;
mod tables;

use axum::{Router, routing::get};

use super::state::AppState;

pub use items::ItemResponse;
pub use tables::{TableListResponse, TableMetaResponse, TableViewResponse};

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/tables", get(tables::list_tables))
        .route("/api/v1/tables/{table}", get(tables::table_view))
        .route("/api/v1/tables/{table}/meta", get(tables::table_meta))
        .route("/api/v1/tables/{table}/items/{key}", get(items::get_item))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
