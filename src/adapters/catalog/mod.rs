//! Catalog adapters.

mod credentials;
mod in_memory;
mod moltin;

pub use credentials::CredentialCache;
pub use in_memory::InMemoryCatalog;
pub use moltin::{MoltinCatalogClient, MoltinConfig};
