//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `eventhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use eventhub_app::config::ServiceConfig;

/// Longest accepted cache TTL: one year.
const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;
/// Longest accepted per-call deadline: one hour.
const MAX_REQUEST_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Event cache settings.
    pub cache: CacheConfig,
    /// Per-request limits.
    pub requests: RequestsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// Pool size.
    pub max_connections: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Where event snapshots are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process map, private to this instance.
    Memory,
    /// Shared `Redis` server.
    Redis,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(ConfigError::Validation(format!(
                "unknown cache backend `{other}`, expected `memory` or `redis`"
            ))),
        }
    }
}

/// Event cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache implementation.
    pub backend: CacheBackend,
    /// Snapshot lifetime in seconds.
    pub ttl_secs: u64,
    /// `Redis` connection URL, used by the `redis` backend.
    pub redis_url: String,
}

/// Per-request limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RequestsConfig {
    /// Deadline for each storage or cache call, in milliseconds.
    pub timeout_ms: u64,
}

impl Config {
    /// Load configuration from `eventhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, if an
    /// override cannot be parsed, or if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("eventhub.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("EVENTHUB_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("EVENTHUB_PORT") {
            self.server.port = parse_var("EVENTHUB_PORT", &val)?;
        }
        if let Some(val) = lookup("EVENTHUB_BIND") {
            let (host, port) = val.rsplit_once(':').ok_or_else(|| {
                ConfigError::Validation(format!("EVENTHUB_BIND `{val}` is not host:port"))
            })?;
            self.server.port = parse_var("EVENTHUB_BIND", port)?;
            self.server.host = host.to_string();
        }
        if let Some(val) = lookup("EVENTHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = lookup("EVENTHUB_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("EVENTHUB_DATABASE_MAX_CONNECTIONS", &val)?;
        }
        if let Some(val) = lookup("EVENTHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("EVENTHUB_CACHE_BACKEND") {
            self.cache.backend = val.parse()?;
        }
        if let Some(val) = lookup("EVENTHUB_CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_var("EVENTHUB_CACHE_TTL_SECS", &val)?;
        }
        if let Some(val) = lookup("EVENTHUB_REDIS_URL") {
            self.cache.redis_url = val;
        }
        if let Some(val) = lookup("EVENTHUB_REQUEST_TIMEOUT_MS") {
            self.requests.timeout_ms = parse_var("EVENTHUB_REQUEST_TIMEOUT_MS", &val)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be non-zero".to_string(),
            ));
        }
        if !(1..=MAX_CACHE_TTL_SECS).contains(&self.cache.ttl_secs) {
            return Err(ConfigError::Validation(format!(
                "cache.ttl_secs must be between 1 and {MAX_CACHE_TTL_SECS}"
            )));
        }
        if !(1..=MAX_REQUEST_TIMEOUT_MS).contains(&self.requests.timeout_ms) {
            return Err(ConfigError::Validation(format!(
                "requests.timeout_ms must be between 1 and {MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Settings handed to the application services.
    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
            call_timeout: Duration::from_millis(self.requests.timeout_ms),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{name} has invalid value `{value}`")))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:eventhub.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "eventhubd=info,eventhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ttl_secs: 60,
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl Default for RequestsConfig {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
