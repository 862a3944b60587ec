//! Configuration loading and constants.
//!
//! Configuration is resolved once at startup: built-in defaults, then an optional
//! TOML file, then environment variables. `AppConfig` is the root struct and is
//! handed to the rest of the application by value; nothing downstream reads the
//! process environment.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

// =============================================================================
// Environment Variables
// =============================================================================

/// TCP port the HTTP listener binds to
pub const ENV_APP_PORT: &str = "APP_PORT";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";
/// Bucket probed by the storage check; unset or empty skips the check
pub const ENV_S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
/// Log output format (text or json)
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

// =============================================================================
// Defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port when APP_PORT is not set
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "backend_status=debug,tower_http=debug";

/// Cache-Control value for the status endpoint. Health answers are never reusable.
pub const CACHE_CONTROL_STATUS: &str = "no-store";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Database connection parameters for the liveness check
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object storage settings for the bucket probe
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Database connection parameters. Every field may be absent; the database check
/// reports a missing host as a failure rather than refusing to start.
#[derive(Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .finish()
    }
}

/// Object storage settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    pub bucket: Option<String>,
}

impl StorageConfig {
    /// The configured bucket. Empty and whitespace-only names count as unset, so
    /// no probe is sent for a name S3 would reject anyway.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref().filter(|b| !b.trim().is_empty())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Validation(format!(
                "Unknown log format {other:?}, expected \"text\" or \"json\""
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing sections take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the effective configuration from an optional file and an
    /// environment lookup. Environment values win over the file; empty values
    /// are treated as unset.
    pub fn resolve<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env(key).filter(|v| !v.trim().is_empty()))?;
        Ok(config)
    }

    /// Resolve against the process environment.
    pub fn from_process_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve(path, |key| std::env::var(key).ok())
    }

    fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var(ENV_APP_PORT) {
            self.http.port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{ENV_APP_PORT} must be a TCP port, got {port:?}"))
            })?;
        }

        if let Some(host) = var(ENV_DB_HOST) {
            self.database.host = Some(host);
        }
        if let Some(user) = var(ENV_DB_USER) {
            self.database.user = Some(user);
        }
        if let Some(password) = var(ENV_DB_PASSWORD) {
            self.database.password = Some(password);
        }
        if let Some(name) = var(ENV_DB_NAME) {
            self.database.name = Some(name);
        }

        if let Some(bucket) = var(ENV_S3_BUCKET_NAME) {
            self.storage.bucket = Some(bucket);
        }

        if let Some(format) = var(ENV_LOG_FORMAT) {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
