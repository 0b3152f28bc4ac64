//! Distance-based delivery policy.
//!
//! Tiers are evaluated in ascending order and the first match wins, so a
//! distance lying exactly on a boundary belongs to the lower tier.

use serde::{Deserialize, Serialize};

/// Radius within which self-pickup is suggested (delivery is still free).
pub const PICKUP_RADIUS_KM: f64 = 0.5;

/// A paid delivery bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryTier {
    /// Inclusive upper bound of the bracket.
    pub max_distance_km: f64,
    pub price_rubles: u32,
}

/// Paid brackets in ascending order of distance.
pub const DELIVERY_TIERS: [DeliveryTier; 2] = [
    DeliveryTier {
        max_distance_km: 5.0,
        price_rubles: 100,
    },
    DeliveryTier {
        max_distance_km: 20.0,
        price_rubles: 300,
    },
];

/// What the customer is offered for a given distance to the nearest pizzeria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryDecision {
    /// Close enough to walk; free delivery is offered as well.
    PickupSuggested,
    /// Courier delivery at a fixed price.
    Delivery { price_rubles: u32 },
    /// Too far away; the order cannot be delivered.
    OutOfRange,
}

impl DeliveryDecision {
    /// Applies the tier policy to a distance in kilometres.
    ///
    /// A non-finite or NaN distance is treated as out of range.
    pub fn for_distance(distance_km: f64) -> Self {
        if distance_km <= PICKUP_RADIUS_KM {
            return Self::PickupSuggested;
        }
        DELIVERY_TIERS
            .iter()
            .find(|tier| distance_km <= tier.max_distance_km)
            .map(|tier| Self::Delivery {
                price_rubles: tier.price_rubles,
            })
            .unwrap_or(Self::OutOfRange)
    }

    /// Whether the customer gets to choose between delivery and pickup.
    pub fn offers_shipping(&self) -> bool {
        !matches!(self, Self::OutOfRange)
    }
}
