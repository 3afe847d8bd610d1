//! # Configuration
//!
//! Layered service configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config/default.toml`, if present
//! 3. The file named by `DELIVERY_REPORTS_CONFIG`, or `--config`
//! 4. Environment variables, `DELIVERY_REPORTS_<SECTION>__<KEY>`
//!
//! ```text
//! DELIVERY_REPORTS_SERVER__PORT=9090
//! DELIVERY_REPORTS_FARE_ESTIMATOR__API_KEY=...
//! DELIVERY_REPORTS_ARTIFACTS__NAMING=legacy
//! ```

use crate::domain::value_objects::ArtifactNaming;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DELIVERY_REPORTS";

/// Environment variable naming an extra configuration file.
pub const CONFIG_PATH_ENV: &str = "DELIVERY_REPORTS_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "config/default";

/// HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if host and port do not form an
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid server address: {}", e)))
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=warn".to_string(),
            json: false,
        }
    }
}

/// Transaction data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionsConfig {
    /// Endpoint URL.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for TransactionsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000/api/transactions".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Fare-estimate service and fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareEstimatorConfig {
    /// Endpoint URL.
    pub base_url: String,
    /// Value of the `X-Api-Key` header.
    pub api_key: String,
    /// HTTP client timeout in milliseconds.
    pub timeout_ms: u64,
    /// Bound on each area's request in milliseconds.
    pub per_area_timeout_ms: u64,
    /// Request rate limit; unlimited when unset.
    pub requests_per_second: Option<u32>,
    /// JSON area catalog replacing the built-in one.
    pub area_catalog_path: Option<PathBuf>,
}

impl Default for FareEstimatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9100/api/fare/estimate".to_string(),
            api_key: String::new(),
            timeout_ms: 10_000,
            per_area_timeout_ms: 10_000,
            requests_per_second: None,
            area_catalog_path: None,
        }
    }
}

/// Neighborhood catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeographyConfig {
    /// JSON catalog file.
    pub catalog_path: PathBuf,
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("config/geography.json"),
        }
    }
}

/// Artifact output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory rendered reports are written to.
    pub output_dir: PathBuf,
    /// File naming scheme.
    pub naming: ArtifactNaming,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            naming: ArtifactNaming::PerJob,
        }
    }
}

/// Email delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Send mail; when false deliveries are only logged.
    pub enabled: bool,
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
    /// Use TLS to the relay.
    pub tls: bool,
    /// SMTP login.
    pub username: String,
    /// SMTP password.
    pub password: String,
    /// Sender address.
    pub from: String,
    /// Recipient of every report.
    pub recipient: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            tls: true,
            username: String::new(),
            password: String::new(),
            from: "reports@localhost".to_string(),
            recipient: "reports@localhost".to_string(),
        }
    }
}

/// Background jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Jobs executing at once.
    pub max_concurrent: usize,
    /// Seconds a finished job stays queryable; `0` keeps jobs forever.
    pub retention_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            retention_secs: 3600,
        }
    }
}

impl JobsConfig {
    /// Retention window for finished jobs, `None` when disabled.
    #[must_use]
    pub fn retention(&self) -> Option<Duration> {
        (self.retention_secs > 0).then(|| Duration::from_secs(self.retention_secs))
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Log output.
    pub logging: LoggingConfig,
    /// Transaction data service.
    pub transactions: TransactionsConfig,
    /// Fare-estimate service.
    pub fare_estimator: FareEstimatorConfig,
    /// Neighborhood catalog.
    pub geography: GeographyConfig,
    /// Artifact output.
    pub artifacts: ArtifactsConfig,
    /// Email delivery.
    pub notification: NotificationConfig,
    /// Background jobs.
    pub jobs: JobsConfig,
}

impl AppConfig {
    /// Loads configuration from every source.
    ///
    /// `explicit` (the `--config` flag) takes precedence over
    /// `DELIVERY_REPORTS_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a named file is missing or any source is
    /// malformed, or if the result fails [`AppConfig::validate`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let file = explicit.map(Path::to_path_buf).or(from_env);
        Self::load_with(file.as_deref(), Self::environment())
    }

    /// Loads configuration from defaults, an optional file and `env`.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load`].
    pub fn load_with(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Environment source with the service prefix.
    #[must_use]
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs.max_concurrent == 0 {
            return Err(ConfigError::Message(
                "jobs.max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.transactions.base_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "transactions.base_url must be set".to_string(),
            ));
        }
        if self.fare_estimator.base_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "fare_estimator.base_url must be set".to_string(),
            ));
        }
        if self.notification.enabled && self.notification.smtp_host.trim().is_empty() {
            return Err(ConfigError::Message(
                "notification.smtp_host must be set when notification is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
