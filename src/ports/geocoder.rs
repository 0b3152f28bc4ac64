//! Geocoder Port - free-text address to coordinates.

use async_trait::async_trait;

use crate::domain::delivery::Coordinates;

/// Errors returned by the geocoding service.
///
/// An address that cannot be resolved is not an error: `geocode` returns
/// `Ok(None)`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeocoderError {
    #[error("Geocoder unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected geocoder response: {0}")]
    InvalidResponse(String),
}

/// Port for resolving addresses.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address, `None` when nothing matches.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocoderError>;
}
