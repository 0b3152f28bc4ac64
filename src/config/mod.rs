//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PIZZA_BOT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use pizza_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Running {} workers", config.bot.workers);
//! ```

mod bot;
mod catalog;
mod error;
mod geocoder;
mod redis;

pub use bot::{BotConfig, Environment};
pub use catalog::CatalogConfig;
pub use error::{ConfigError, ValidationError};
pub use geocoder::GeocoderConfig;
pub use redis::RedisConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Telegram access, worker pool, timings
    pub bot: BotConfig,

    /// Redis configuration (session store)
    pub redis: RedisConfig,

    /// Commerce platform (products, carts, pizzerias)
    pub catalog: CatalogConfig,

    /// Address geocoding
    pub geocoder: GeocoderConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PIZZA_BOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PIZZA_BOT__BOT__TELEGRAM_TOKEN=...` -> `bot.telegram_token = ...`
    /// - `PIZZA_BOT__REDIS__URL=...` -> `redis.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PIZZA_BOT")
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
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bot.validate()?;
        self.redis.validate()?;
        self.catalog.validate(self.is_production())?;
        self.geocoder.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.bot.is_production()
    }
}
