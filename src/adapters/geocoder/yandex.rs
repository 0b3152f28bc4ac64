//! Yandex HTTP Geocoder adapter.
//!
//! Takes the first (most relevant) feature member of the answer. Its
//! `Point.pos` is "longitude latitude", space separated.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::delivery::Coordinates;
use crate::ports::{Geocoder, GeocoderError};

/// Configuration for the Yandex geocoder.
#[derive(Debug, Clone)]
pub struct YandexConfig {
    api_key: Secret<String>,
    /// Base URL (default: https://geocode-maps.yandex.ru/1.x).
    pub base_url: String,
    pub timeout: Duration,
}

impl YandexConfig {
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            base_url: "https://geocode-maps.yandex.ru/1.x".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct YandexGeocoder {
    config: YandexConfig,
    http: Client,
}

impl YandexGeocoder {
    pub fn new(config: YandexConfig) -> Result<Self, GeocoderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocoderError::Unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Debug, Deserialize)]
struct Point {
    pos: String,
}

/// Parses "lon lat".
fn parse_pos(pos: &str) -> Result<Coordinates, GeocoderError> {
    let invalid = || GeocoderError::InvalidResponse(format!("bad position {:?}", pos));
    let mut parts = pos.split_whitespace();
    let longitude: f64 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let latitude: f64 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Coordinates::new(latitude, longitude).map_err(|e| GeocoderError::InvalidResponse(e.to_string()))
}

fn first_match(body: GeocodeResponse) -> Result<Option<Coordinates>, GeocoderError> {
    match body.response.collection.members.into_iter().next() {
        None => Ok(None),
        Some(member) => parse_pos(&member.object.point.pos).map(Some),
    }
}

#[async_trait]
impl Geocoder for YandexGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocoderError> {
        tracing::debug!(address, "Geocoding address");

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("geocode", address),
                ("apikey", self.config.api_key.expose_secret().as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| GeocoderError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            tracing::error!(%status, "Geocoder rejected API key");
        }
        if !status.is_success() {
            return Err(GeocoderError::Unavailable(format!("geocoder returned {}", status)));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocoderError::InvalidResponse(e.to_string()))?;
        first_match(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn first_member_position_is_lon_lat() {
        let parsed = body(
            r#"{"response": {"GeoObjectCollection": {
                "metaDataProperty": {},
                "featureMember": [
                    {"GeoObject": {"name": "Тверская улица, 1", "Point": {"pos": "37.611347 55.757880"}}},
                    {"GeoObject": {"Point": {"pos": "30.0 59.0"}}}
                ]
            }}}"#,
        );
        let coordinates = first_match(parsed).unwrap().unwrap();
        assert!((coordinates.latitude() - 55.757880).abs() < 1e-9);
        assert!((coordinates.longitude() - 37.611347).abs() < 1e-9);
    }

    #[test]
    fn empty_collection_is_not_found() {
        let parsed = body(r#"{"response": {"GeoObjectCollection": {"featureMember": []}}}"#);
        assert_eq!(first_match(parsed), Ok(None));
    }

    #[test]
    fn malformed_position_is_invalid_response() {
        assert!(matches!(parse_pos("37.6"), Err(GeocoderError::InvalidResponse(_))));
        assert!(matches!(parse_pos("a b"), Err(GeocoderError::InvalidResponse(_))));
        assert!(matches!(parse_pos("37.6 95.0"), Err(GeocoderError::InvalidResponse(_))));
    }
}
