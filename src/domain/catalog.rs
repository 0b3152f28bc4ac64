//! Catalog and cart value types as seen by the conversation.
//!
//! Prices arrive already formatted by the store backend; the bot only
//! displays them.

use serde::{Deserialize, Serialize};

/// A menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
}

/// Full product card shown after a menu selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub formatted_price: String,
}

/// One line of a cart. `id` is the line id, not the product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub formatted_total: String,
}
