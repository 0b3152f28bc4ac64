//! Catalog Port - Interface for the store backend.
//!
//! Covers the product catalog, the per-user cart, the list of pizzerias with
//! their couriers, and customer address records. Every call is a network
//! round trip; failures are surfaced as-is and never retried here.

use async_trait::async_trait;

use crate::domain::catalog::{CartLine, Product, ProductDetail};
use crate::domain::delivery::{Coordinates, PizzeriaLocation};
use crate::domain::foundation::UserId;

/// Errors returned by the store backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Catalog resource not found: {0}")]
    NotFound(String),

    #[error("Unexpected catalog response: {0}")]
    InvalidResponse(String),

    #[error("No courier registered for pizzeria at {0}")]
    CourierNotFound(String),
}

/// Port for catalog, cart and location queries.
///
/// The cart of a user is addressed by the user's id.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;

    async fn get_product(&self, product_id: &str) -> Result<ProductDetail, CatalogError>;

    /// URL of the product's main image, `None` when it has none.
    async fn get_image_url(&self, product_id: &str) -> Result<Option<String>, CatalogError>;

    async fn add_to_cart(
        &self,
        cart: UserId,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), CatalogError>;

    /// Remove a cart line by its line id.
    async fn remove_from_cart(&self, cart: UserId, line_id: &str) -> Result<(), CatalogError>;

    async fn list_cart_lines(&self, cart: UserId) -> Result<Vec<CartLine>, CatalogError>;

    /// Cart total, formatted for display.
    async fn get_cart_total(&self, cart: UserId) -> Result<String, CatalogError>;

    async fn list_pizzerias(&self) -> Result<Vec<PizzeriaLocation>, CatalogError>;

    /// Chat of the courier serving the pizzeria at `address`.
    ///
    /// # Errors
    /// Returns `CatalogError::CourierNotFound` if no pizzeria at that address
    /// has a courier.
    async fn resolve_courier_for_address(&self, address: &str) -> Result<UserId, CatalogError>;

    /// Record where a customer wants the order delivered.
    async fn create_customer_address(
        &self,
        customer: UserId,
        coordinates: Coordinates,
    ) -> Result<(), CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_not_found_names_the_address() {
        let err = CatalogError::CourierNotFound("Main st 1".to_string());
        assert!(err.to_string().contains("Main st 1"));
    }

    #[test]
    fn unauthorized_is_distinct_from_unavailable() {
        assert_ne!(
            CatalogError::Unauthorized("x".to_string()),
            CatalogError::Unavailable("x".to_string())
        );
    }
}
