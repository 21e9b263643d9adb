//! Store configuration
//!
//! Settings are read from the process environment with the `LEDGER_`
//! prefix, falling back to local-development defaults. A `.env` file in
//! the working directory is honoured when present.

use serde::Deserialize;

use crate::pool::DatabaseConfig;

/// Persistence settings for the stock ledger store
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Database URL
    pub database_url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Log level
    pub log_level: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/stockledger".to_string(),
            max_connections: 10,
            log_level: "info".to_string(),
        }
    }
}

impl StoreSettings {
    /// Loads settings from environment variables
    ///
    /// Recognised variables:
    ///
    /// * `LEDGER_DATABASE_URL` - PostgreSQL connection string
    /// * `LEDGER_MAX_CONNECTIONS` - Pool size (default: 10)
    /// * `LEDGER_LOG_LEVEL` - Log level: trace, debug, info, warn, error
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("LEDGER"))
            .build()?
            .try_deserialize()
    }

    /// Loads a `.env` file when present, then reads settings from the
    /// environment, falling back to defaults for anything unset
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Self::from_env().unwrap_or_else(|_| Self {
            database_url: std::env::var("LEDGER_DATABASE_URL")
                .or_else(|_| std::env::var("DATABASE_URL"))
                .unwrap_or_else(|_| "postgres://localhost/stockledger".to_string()),
            max_connections: std::env::var("LEDGER_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            log_level: std::env::var("LEDGER_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the pool configuration these settings describe
    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url).max_connections(self.max_connections)
    }
}
