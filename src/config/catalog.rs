//! Catalog (Moltin) configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Commerce platform credentials and flow names
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: Secret<String>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Flow holding pizzeria entries
    #[serde(default = "default_pizzeria_flow")]
    pub pizzeria_flow: String,

    /// Flow receiving customer coordinates
    #[serde(default = "default_customer_address_flow")]
    pub customer_address_flow: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate catalog configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingRequired("CATALOG__CLIENT_ID"));
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("CATALOG__CLIENT_SECRET"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("CATALOG__BASE_URL"));
        }
        if production && !self.base_url.starts_with("https://") {
            return Err(ValidationError::MustBeHttps("CATALOG__BASE_URL"));
        }
        if self.pizzeria_flow.is_empty() {
            return Err(ValidationError::MissingRequired("CATALOG__PIZZERIA_FLOW"));
        }
        if self.customer_address_flow.is_empty() {
            return Err(ValidationError::MissingRequired("CATALOG__CUSTOMER_ADDRESS_FLOW"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("catalog"));
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: Secret::new(String::new()),
            base_url: default_base_url(),
            pizzeria_flow: default_pizzeria_flow(),
            customer_address_flow: default_customer_address_flow(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.moltin.com".to_string()
}

fn default_pizzeria_flow() -> String {
    "pizzeria".to_string()
}

fn default_customer_address_flow() -> String {
    "customer_address".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CatalogConfig {
        CatalogConfig {
            client_id: "client".to_string(),
            client_secret: Secret::new("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_catalog_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, "https://api.moltin.com");
        assert_eq!(config.pizzeria_flow, "pizzeria");
        assert_eq!(config.customer_address_flow, "customer_address");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_credentials() {
        assert_eq!(
            CatalogConfig::default().validate(false),
            Err(ValidationError::MissingRequired("CATALOG__CLIENT_ID"))
        );
        let config = CatalogConfig {
            client_id: "client".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(false),
            Err(ValidationError::MissingRequired("CATALOG__CLIENT_SECRET"))
        );
    }

    #[test]
    fn test_plain_http_allowed_outside_production() {
        let config = CatalogConfig {
            base_url: "http://localhost:8080".to_string(),
            ..valid()
        };
        assert!(config.validate(false).is_ok());
        assert_eq!(
            config.validate(true),
            Err(ValidationError::MustBeHttps("CATALOG__BASE_URL"))
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CatalogConfig {
            timeout_secs: 0,
            ..valid()
        };
        assert_eq!(config.validate(false), Err(ValidationError::InvalidTimeout("catalog")));
    }
}
