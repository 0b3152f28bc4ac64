//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid Telegram bot token format")]
    InvalidBotToken,

    #[error("Worker pool size must be between 1 and 256")]
    InvalidWorkerCount,

    #[error("Invalid timeout for {0}")]
    InvalidTimeout(&'static str),

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Redis key prefix must be non-empty and contain no ':'")]
    InvalidKeyPrefix,

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("{0} must use HTTPS in production")]
    MustBeHttps(&'static str),
}
