//! API configuration
//!
//! Settings come from `API_`-prefixed environment variables layered over the
//! defaults below (`API_PORT=9000`, `API_STORAGE=memory`, ...).

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Where customers and addresses are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL, required with the postgres backend
    pub database_url: Option<String>,
    /// Storage backend
    pub storage: StorageBackend,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Base URL of the ViaCEP service
    pub viacep_base_url: String,
    /// Timeout for a single postal code lookup
    pub lookup_timeout_secs: u64,
    /// Maximum database connections
    pub db_max_connections: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            storage: StorageBackend::Postgres,
            log_level: "info".to_string(),
            log_json: false,
            viacep_base_url: "https://viacep.com.br/".to_string(),
            lookup_timeout_secs: 10,
            db_max_connections: 10,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed, or if the
    /// postgres backend is selected without `API_DATABASE_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .set_default("storage", "postgres")?
            .set_default("log_level", "info")?
            .set_default("log_json", false)?
            .set_default("viacep_base_url", "https://viacep.com.br/")?
            .set_default("lookup_timeout_secs", 10_i64)?
            .set_default("db_max_connections", 10_i64)?
            .add_source(Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage == StorageBackend::Postgres
            && self.database_url.as_deref().map_or(true, |url| url.trim().is_empty())
        {
            return Err(ConfigError::Message(
                "API_DATABASE_URL is required when API_STORAGE=postgres".to_string(),
            ));
        }
        if self.lookup_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "API_LOOKUP_TIMEOUT_SECS must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
