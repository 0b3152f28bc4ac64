//! Per-user working data of an order in flight.

use serde::{Deserialize, Serialize};

use crate::domain::delivery::{Coordinates, NearestPizzeria};

/// Data collected during earlier turns that later turns depend on.
///
/// Each field is overwritten when a handler produces a new value and is
/// never cleared implicitly, so coordinates captured while waiting for an
/// address are still there when the shipping method is chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    pub selected_product_id: Option<String>,
    pub customer_coordinates: Option<Coordinates>,
    pub nearest_pizzeria: Option<NearestPizzeria>,
}

impl SessionContext {
    pub fn select_product(&mut self, product_id: impl Into<String>) {
        self.selected_product_id = Some(product_id.into());
    }

    pub fn record_coordinates(&mut self, coordinates: Coordinates) {
        self.customer_coordinates = Some(coordinates);
    }

    pub fn record_nearest(&mut self, nearest: NearestPizzeria) {
        self.nearest_pizzeria = Some(nearest);
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
