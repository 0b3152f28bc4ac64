//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `session` - Session store implementations (in-memory, Redis)
//! - `catalog` - Store backend implementations (in-memory, Moltin)
//! - `geocoder` - Address lookup implementations (static table, Yandex)
//! - `telegram` - Bot API transport and the polling dispatch loop
//! - `transport` - Recording transport for tests and dry runs

pub mod catalog;
pub mod geocoder;
pub mod session;
pub mod telegram;
pub mod transport;
