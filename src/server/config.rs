//! Server configuration parsing.

use serde::Deserialize;
use std::path::Path;

use crate::backend::DynamoConfig;

/// Configuration file read when no `--config` is given, if present.
pub const DEFAULT_CONFIG_PATH: &str = "dynamo-browse.toml";

/// Server configuration loaded from TOML file.
///
/// Every section is optional; missing values fall back to a local setup
/// (backend on `http://localhost:8000`, any free port).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Storage backend connection.
    pub backend: DynamoConfig,
    /// CORS settings.
    pub cors: CorsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Server bind settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1" or "0.0.0.0").
    pub bind: String,
    /// Port to listen on; 0 lets the OS pick a free port.
    pub port: u16,
    /// Directory of a static front end served for non-API paths.
    pub static_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 0,
            static_path: None,
        }
    }
}

/// Cross-origin settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds.
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_origins: vec!["*".to_string()],
            allow_methods: vec!["GET".to_string()],
            allow_headers: vec!["content-type".to_string()],
            allow_credentials: false,
            max_age: 3600,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "dynamo_browse=debug,tower_http=info".
    pub level: String,
    pub format: LogFormat,
    /// "stdout", "stderr" or a file path.
    pub output: String,
    pub color: bool,
    pub timestamps: bool,
    /// Include the event target (module path).
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            output: "stderr".to_string(),
            color: true,
            timestamps: true,
            target: false,
        }
    }
}

/// Values given on the command line or through the environment.
///
/// Set fields replace the corresponding file values.
#[derive(Debug, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML file, or defaults if the file does not exist.
    pub fn from_file_if_exists(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Apply command line / environment overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.backend.endpoint = Some(endpoint);
        }
        if let Some(region) = overrides.region {
            self.backend.region = region;
        }
        if let Some(access_key_id) = overrides.access_key_id {
            self.backend.access_key_id = access_key_id;
        }
        if let Some(secret_access_key) = overrides.secret_access_key {
            self.backend.secret_access_key = secret_access_key;
        }
        self
    }

    /// Get the socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(String, std::io::Error),
    /// TOML parse error.
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Failed to read config file '{}': {}", path, e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
