//! Bot runtime configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Bot configuration (Telegram access, worker pool, timings)
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token, "<id>:<secret>"
    pub telegram_token: Secret<String>,

    /// Environment name
    #[serde(default)]
    pub environment: Environment,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Turns processed concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Long-poll timeout of getUpdates in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Delay of the courtesy message after an order, in seconds
    #[serde(default = "default_follow_up_delay")]
    pub follow_up_delay_secs: u64,

    /// Bot API base URL (a local Bot API server in some deployments)
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl BotConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn follow_up_delay(&self) -> Duration {
        Duration::from_secs(self.follow_up_delay_secs)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let token = self.telegram_token.expose_secret();
        if token.is_empty() {
            return Err(ValidationError::MissingRequired("BOT__TELEGRAM_TOKEN"));
        }
        match token.split_once(':') {
            Some((id, secret)) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) && !secret.is_empty() => {}
            _ => return Err(ValidationError::InvalidBotToken),
        }
        if !(1..=256).contains(&self.workers) {
            return Err(ValidationError::InvalidWorkerCount);
        }
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 50 {
            return Err(ValidationError::InvalidTimeout("telegram long poll"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("BOT__API_URL"));
        }
        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: Secret::new(String::new()),
            environment: Environment::default(),
            log_level: default_log_level(),
            workers: default_workers(),
            poll_timeout_secs: default_poll_timeout(),
            follow_up_delay_secs: default_follow_up_delay(),
            api_url: default_api_url(),
        }
    }
}

fn default_log_level() -> String {
    "info,pizza_bot=debug".to_string()
}

fn default_workers() -> usize {
    16
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_follow_up_delay() -> u64 {
    3600
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> BotConfig {
        BotConfig {
            telegram_token: Secret::new("123456:ABC-def".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_bot_config_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.workers, 16);
        assert_eq!(config.follow_up_delay(), Duration::from_secs(3600));
        assert_eq!(config.poll_timeout(), Duration::from_secs(30));
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(
            BotConfig::default().validate(),
            Err(ValidationError::MissingRequired("BOT__TELEGRAM_TOKEN"))
        );
    }

    #[test]
    fn test_malformed_token() {
        for token in ["no-colon", ":secret", "abc:secret", "123:"] {
            let config = BotConfig {
                telegram_token: Secret::new(token.to_string()),
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidBotToken), "{}", token);
        }
    }

    #[test]
    fn test_worker_bounds() {
        let zero = BotConfig { workers: 0, ..valid() };
        let huge = BotConfig { workers: 257, ..valid() };
        assert_eq!(zero.validate(), Err(ValidationError::InvalidWorkerCount));
        assert_eq!(huge.validate(), Err(ValidationError::InvalidWorkerCount));
    }

    #[test]
    fn test_is_production() {
        let mut config = valid();
        assert!(!config.is_production());
        config.environment = Environment::Production;
        assert!(config.is_production());
    }
}
