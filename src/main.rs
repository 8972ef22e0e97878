//! dynamo-browse HTTP server.

use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use dynamo_browse::server::{
    AppState, Config, CorsConfig, DEFAULT_CONFIG_PATH, Overrides, init_logging, router,
};

/// dynamo-browse HTTP server.
#[derive(Parser, Debug)]
#[command(name = "dynamo-browse")]
#[command(about = "Browse the tables of a DynamoDB-compatible store over HTTP")]
struct Args {
    /// Path to the configuration file (defaults to ./dynamo-browse.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on; 0 picks any free port.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Storage backend endpoint URL.
    #[arg(long, env = "DYNAMO_ENDPOINT")]
    endpoint: Option<String>,

    /// Storage backend region.
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Access key id for the storage backend.
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: Option<String>,

    /// Secret access key for the storage backend.
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind: self.bind.clone(),
            port: self.port,
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
        }
    }
}

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        // Deny all cross-origin requests by default
        return CorsLayer::new();
    }

    let mut cors = CorsLayer::new();

    if config.allow_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .allow_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<_> = config
        .allow_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    let headers: Vec<_> = config
        .allow_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    cors = cors.allow_methods(methods).allow_headers(headers);

    if config.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    cors.max_age(Duration::from_secs(config.max_age))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration first (needed for logging setup)
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_file_if_exists(DEFAULT_CONFIG_PATH)?,
    }
    .with_overrides(args.overrides());

    init_logging(&config.logging)?;

    let state = AppState::connect(&config.backend).await;

    let mut app = router(state);

    if let Some(static_path) = &config.server.static_path {
        tracing::info!("Serving static files from: {}", static_path);
        app = app.fallback_service(ServeDir::new(static_path));
    }

    let cors = build_cors_layer(&config.cors);
    if config.cors.enabled {
        tracing::info!(
            "CORS enabled with {} allowed origin(s)",
            config.cors.allow_origins.len()
        );
    }

    let app: Router = app.layer(cors).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Port 0 binds whatever is free; report the real one
    tracing::info!("dynamo-browse listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
