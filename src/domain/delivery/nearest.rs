//! Nearest pizzeria selection.

use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::domain::foundation::UserId;

/// A pizzeria as listed in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PizzeriaLocation {
    pub address: String,
    pub coordinates: Coordinates,
    /// Chat of the courier serving this pizzeria, when one is registered.
    pub courier: Option<UserId>,
}

/// The pizzeria closest to a customer, kept for the rest of the order flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestPizzeria {
    pub address: String,
    pub distance_km: f64,
}

impl NearestPizzeria {
    pub fn distance_m(&self) -> f64 {
        self.distance_km * 1000.0
    }

    /// Distance rounded to whole kilometres for display.
    pub fn rounded_km(&self) -> i64 {
        self.distance_km.round() as i64
    }
}

/// Returns the pizzeria with the strictly smallest distance to `customer`.
///
/// On exact ties the first candidate in iteration order wins. Returns `None`
/// only for an empty candidate set.
pub fn find_nearest(customer: &Coordinates, pizzerias: &[PizzeriaLocation]) -> Option<NearestPizzeria> {
    pizzerias
        .iter()
        .map(|p| (p, customer.distance_km(&p.coordinates)))
        .fold(None, |best: Option<(&PizzeriaLocation, f64)>, (p, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((p, d)),
        })
        .map(|(p, d)| NearestPizzeria {
            address: p.address.clone(),
            distance_km: d,
        })
}
