//! Static Geocoder Adapter
//!
//! Resolves addresses from a fixed table. Used in tests and local runs
//! without a geocoding API key.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::delivery::Coordinates;
use crate::ports::{Geocoder, GeocoderError};

#[derive(Debug, Default)]
struct State {
    addresses: HashMap<String, Coordinates>,
    lookups: usize,
    fail_next: Option<GeocoderError>,
}

/// Geocoder backed by an address table. Lookups are exact after trimming.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    state: Arc<Mutex<State>>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(self, address: impl Into<String>, coordinates: Coordinates) -> Self {
        self.state
            .lock()
            .unwrap()
            .addresses
            .insert(address.into(), coordinates);
        self
    }

    /// Makes the next lookup fail as unavailable.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_next = Some(GeocoderError::Unavailable(message.into()));
    }

    /// Number of lookups attempted.
    pub fn lookups(&self) -> usize {
        self.state.lock().unwrap().lookups
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocoderError> {
        let mut state = self.state.lock().unwrap();
        state.lookups += 1;
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        Ok(state.addresses.get(address.trim()).copied())
    }
}
