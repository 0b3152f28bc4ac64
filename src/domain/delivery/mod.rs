//! Delivery eligibility: where the customer is, which pizzeria is nearest,
//! and what delivery terms that distance earns.

mod coordinates;
mod decision;
mod nearest;

pub use coordinates::{geodesic_distance_km, great_circle_distance_km, Coordinates};
pub use decision::{DeliveryDecision, DeliveryTier, DELIVERY_TIERS, PICKUP_RADIUS_KM};
pub use nearest::{find_nearest, NearestPizzeria, PizzeriaLocation};
