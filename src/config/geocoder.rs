//! Geocoder (Yandex) configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Geocoding service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    /// API key
    pub api_key: Secret<String>,

    /// Endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate geocoder configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("GEOCODER__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("GEOCODER__BASE_URL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("geocoder"));
        }
        Ok(())
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: Secret::new(String::new()),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://geocode-maps.yandex.ru/1.x".to_string()
}

fn default_timeout() -> u64 {
    10
}
