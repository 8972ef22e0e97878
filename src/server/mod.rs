//! HTTP browsing API.
//!
//! Read-only JSON endpoints over a [`StorageBackend`](crate::StorageBackend):
//!
//! - `GET /api/v1/tables` - every table's description
//! - `GET /api/v1/tables/{table}` - description plus scanned rows, each with its key token
//! - `GET /api/v1/tables/{table}/meta` - description plus raw scanned rows
//! - `GET /api/v1/tables/{table}/items/{key}` - the item a key token addresses

mod config;
mod error;
mod logging;
mod routes;
mod state;

pub use config::{
    Config, ConfigError, CorsConfig, DEFAULT_CONFIG_PATH, LogFormat, LoggingConfig, Overrides,
    ServerConfig,
};
pub use error::ApiError;
pub use logging::{LoggingError, init as init_logging};
pub use routes::{ItemResponse, TableListResponse, TableMetaResponse, TableViewResponse, router};
pub use state::AppState;
