//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the conversation core and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - per-user state token and working context
//! - `CatalogClient` - products, cart, pizzerias and couriers
//! - `Geocoder` - address text to coordinates
//! - `Transport` - outbound chat messages and delayed messages

mod catalog;
mod geocoder;
mod session_store;
mod transport;

pub use catalog::{CatalogClient, CatalogError};
pub use geocoder::{Geocoder, GeocoderError};
pub use session_store::{SessionStore, SessionStoreError};
pub use transport::{Transport, TransportError};
