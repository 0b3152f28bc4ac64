//! Session store connection settings.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where per-user conversation state and context are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// `redis://` or `rediss://` URL
    pub url: String,

    /// Namespace of the session keys; bots sharing one Redis need distinct prefixes
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS__URL"));
        }
        if !["redis://", "rediss://"].iter().any(|scheme| self.url.starts_with(scheme)) {
            return Err(ValidationError::InvalidRedisUrl);
        }
        // Keys are "{prefix}:state:{user}", so the prefix must not contain the separator.
        if self.key_prefix.is_empty() || self.key_prefix.contains(':') {
            return Err(ValidationError::InvalidKeyPrefix);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("redis"));
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key_prefix: default_key_prefix(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_key_prefix() -> String {
    "pizza_bot".to_string()
}

fn default_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> RedisConfig {
        RedisConfig {
            url: "redis://localhost:6379".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn local_url_with_default_prefix_is_valid() {
        let config = local();
        assert_eq!(config.key_prefix, "pizza_bot");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_redis_scheme_is_rejected() {
        let config = RedisConfig {
            url: "http://localhost:6379".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRedisUrl));
    }

    #[test]
    fn prefix_must_be_a_single_key_segment() {
        for prefix in ["", "pizza:bot"] {
            let config = RedisConfig {
                key_prefix: prefix.to_string(),
                ..local()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidKeyPrefix), "{:?}", prefix);
        }
    }
}
