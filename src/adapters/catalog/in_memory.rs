//! In-Memory Catalog Adapter
//!
//! A self-contained store backend for tests and local runs: a fixed product
//! list, per-user carts, pizzerias and recorded customer addresses.
//!
//! # Features
//!
//! - Error injection for the next call (`fail_next`)
//! - Call tracking for cart totals
//! - Direct cart seeding and inspection

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::catalog::{CartLine, Product, ProductDetail};
use crate::domain::delivery::{Coordinates, PizzeriaLocation};
use crate::domain::foundation::UserId;
use crate::ports::{CatalogClient, CatalogError};

#[derive(Debug, Clone)]
struct StoredProduct {
    id: String,
    name: String,
    description: String,
    price_rubles: u32,
    image_url: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredLine {
    id: String,
    product_id: String,
    quantity: u32,
}

#[derive(Debug, Default)]
struct State {
    products: Vec<StoredProduct>,
    carts: HashMap<UserId, Vec<StoredLine>>,
    pizzerias: Vec<PizzeriaLocation>,
    customer_addresses: Vec<(UserId, Coordinates)>,
    next_line: u64,
    total_requests: usize,
    fail_next: Option<CatalogError>,
}

/// In-memory catalog with prices in whole rubles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<State>>,
}

fn format_rubles(amount: u32) -> String {
    format!("{} ₽", amount)
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product to the menu.
    pub fn with_product(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price_rubles: u32,
        image_url: Option<&str>,
    ) -> Self {
        self.state.lock().unwrap().products.push(StoredProduct {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price_rubles,
            image_url: image_url.map(str::to_string),
        });
        self
    }

    /// Adds a pizzeria location.
    pub fn with_pizzeria(self, pizzeria: PizzeriaLocation) -> Self {
        self.state.lock().unwrap().pizzerias.push(pizzeria);
        self
    }

    /// Makes the next call fail as unavailable.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.fail_next_with(CatalogError::Unavailable(message.into()));
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next_with(&self, error: CatalogError) {
        self.state.lock().unwrap().fail_next = Some(error);
    }

    pub fn clear_pizzerias(&self) {
        self.state.lock().unwrap().pizzerias.clear();
    }

    /// Puts a line straight into a cart and returns its line id.
    pub fn seed_cart_line(&self, user: UserId, product_id: &str, quantity: u32) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_line += 1;
        let id = format!("line-{}", state.next_line);
        state.carts.entry(user).or_default().push(StoredLine {
            id: id.clone(),
            product_id: product_id.to_string(),
            quantity,
        });
        id
    }

    /// Current cart contents of a user.
    pub fn cart(&self, user: UserId) -> Vec<CartLine> {
        let state = self.state.lock().unwrap();
        state.cart_lines(user)
    }

    /// Number of cart total lookups served.
    pub fn total_requests(&self) -> usize {
        self.state.lock().unwrap().total_requests
    }

    /// Customer addresses recorded so far, oldest first.
    pub fn customer_addresses(&self) -> Vec<(UserId, Coordinates)> {
        self.state.lock().unwrap().customer_addresses.clone()
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, State>, CatalogError> {
        let mut state = self.state.lock().unwrap();
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

impl State {
    fn product(&self, product_id: &str) -> Option<&StoredProduct> {
        self.products.iter().find(|p| p.id == product_id)
    }

    fn cart_lines(&self, user: UserId) -> Vec<CartLine> {
        self.carts
            .get(&user)
            .map(|lines| {
                lines
                    .iter()
                    .map(|line| {
                        let product = self.product(&line.product_id);
                        CartLine {
                            id: line.id.clone(),
                            product_id: line.product_id.clone(),
                            name: product.map(|p| p.name.clone()).unwrap_or_default(),
                            description: product.map(|p| p.description.clone()).unwrap_or_default(),
                            quantity: line.quantity,
                            formatted_total: format_rubles(
                                product.map_or(0, |p| p.price_rubles) * line.quantity,
                            ),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let state = self.begin()?;
        Ok(state
            .products
            .iter()
            .map(|p| Product {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect())
    }

    async fn get_product(&self, product_id: &str) -> Result<ProductDetail, CatalogError> {
        let state = self.begin()?;
        state
            .product(product_id)
            .map(|p| ProductDetail {
                id: p.id.clone(),
                name: p.name.clone(),
                description: p.description.clone(),
                formatted_price: format_rubles(p.price_rubles),
            })
            .ok_or_else(|| CatalogError::NotFound(format!("product {}", product_id)))
    }

    async fn get_image_url(&self, product_id: &str) -> Result<Option<String>, CatalogError> {
        let state = self.begin()?;
        state
            .product(product_id)
            .map(|p| p.image_url.clone())
            .ok_or_else(|| CatalogError::NotFound(format!("product {}", product_id)))
    }

    async fn add_to_cart(
        &self,
        cart: UserId,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), CatalogError> {
        let mut state = self.begin()?;
        if state.product(product_id).is_none() {
            return Err(CatalogError::NotFound(format!("product {}", product_id)));
        }
        state.next_line += 1;
        let line_id = format!("line-{}", state.next_line);
        let lines = state.carts.entry(cart).or_default();
        match lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity += quantity,
            None => lines.push(StoredLine {
                id: line_id,
                product_id: product_id.to_string(),
                quantity,
            }),
        }
        Ok(())
    }

    async fn remove_from_cart(&self, cart: UserId, line_id: &str) -> Result<(), CatalogError> {
        let mut state = self.begin()?;
        if let Some(lines) = state.carts.get_mut(&cart) {
            lines.retain(|l| l.id != line_id);
        }
        Ok(())
    }

    async fn list_cart_lines(&self, cart: UserId) -> Result<Vec<CartLine>, CatalogError> {
        let state = self.begin()?;
        Ok(state.cart_lines(cart))
    }

    async fn get_cart_total(&self, cart: UserId) -> Result<String, CatalogError> {
        let mut state = self.begin()?;
        state.total_requests += 1;
        let total: u32 = state
            .carts
            .get(&cart)
            .map(|lines| {
                lines
                    .iter()
                    .map(|l| state.product(&l.product_id).map_or(0, |p| p.price_rubles) * l.quantity)
                    .sum()
            })
            .unwrap_or(0);
        Ok(format_rubles(total))
    }

    async fn list_pizzerias(&self) -> Result<Vec<PizzeriaLocation>, CatalogError> {
        let state = self.begin()?;
        Ok(state.pizzerias.clone())
    }

    async fn resolve_courier_for_address(&self, address: &str) -> Result<UserId, CatalogError> {
        let state = self.begin()?;
        state
            .pizzerias
            .iter()
            .filter(|p| p.address == address)
            .find_map(|p| p.courier)
            .ok_or_else(|| CatalogError::CourierNotFound(address.to_string()))
    }

    async fn create_customer_address(
        &self,
        customer: UserId,
        coordinates: Coordinates,
    ) -> Result<(), CatalogError> {
        let mut state = self.begin()?;
        state.customer_addresses.push((customer, coordinates));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_product("margherita", "Маргарита", "Томаты", 500, None)
            .with_pizzeria(PizzeriaLocation {
                address: "Main st 1".to_string(),
                coordinates: Coordinates::new(55.75, 37.62).unwrap(),
                courier: Some(UserId::new(900)),
            })
    }

    #[tokio::test]
    async fn repeated_add_increments_one_line() {
        let catalog = catalog();
        let user = UserId::new(1);
        catalog.add_to_cart(user, "margherita", 1).await.unwrap();
        catalog.add_to_cart(user, "margherita", 1).await.unwrap();

        let lines = catalog.list_cart_lines(user).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].formatted_total, "1000 ₽");
        assert_eq!(catalog.get_cart_total(user).await.unwrap(), "1000 ₽");
    }

    #[tokio::test]
    async fn carts_are_per_user() {
        let catalog = catalog();
        catalog.seed_cart_line(UserId::new(1), "margherita", 1);
        assert!(catalog.cart(UserId::new(2)).is_empty());
    }

    #[tokio::test]
    async fn injected_failure_hits_only_the_next_call() {
        let catalog = catalog();
        catalog.fail_next("down");
        assert_eq!(
            catalog.list_products().await,
            Err(CatalogError::Unavailable("down".to_string()))
        );
        assert_eq!(catalog.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn courier_lookup_by_address() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve_courier_for_address("Main st 1").await,
            Ok(UserId::new(900))
        );
        assert!(matches!(
            catalog.resolve_courier_for_address("Elm st 2").await,
            Err(CatalogError::CourierNotFound(_))
        ));
    }
}
