//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `LUBRICORE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use lubricore::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod trial;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use trial::TrialConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Trial entitlement configuration
    #[serde(default)]
    pub trial: TrialConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `LUBRICORE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `LUBRICORE__DATABASE__URL=postgres://...` -> `database.url`
    /// - `LUBRICORE__TRIAL__DAYS=14` -> `trial.days`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot
    /// be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LUBRICORE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.trial.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_checks_every_section() {
        let config = AppConfig {
            database: DatabaseConfig {
                url: "postgres://localhost/lubricore".to_string(),
                ..Default::default()
            },
            trial: TrialConfig::default(),
        };
        assert!(config.validate().is_ok());

        let config = AppConfig {
            database: DatabaseConfig::default(),
            trial: TrialConfig::default(),
        };
        assert!(config.validate().is_err());
    }
}
