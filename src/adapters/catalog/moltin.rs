//! Moltin (Elastic Path) catalog client.
//!
//! Products come from the PCM/catalog APIs, carts are keyed by the chat id,
//! and pizzerias and customer addresses live in two custom flows.
//!
//! # Configuration
//!
//! ```ignore
//! let config = MoltinConfig::new(client_id, client_secret)
//!     .with_base_url("https://api.moltin.com")
//!     .with_flows("pizzeria", "customer_address");
//!
//! let catalog = MoltinCatalogClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::Secret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::domain::catalog::{CartLine, Product, ProductDetail};
use crate::domain::delivery::{Coordinates, PizzeriaLocation};
use crate::domain::foundation::UserId;
use crate::ports::{CatalogClient, CatalogError};

use super::credentials::CredentialCache;

/// Configuration for the Moltin client.
#[derive(Debug, Clone)]
pub struct MoltinConfig {
    pub client_id: String,
    client_secret: Secret<String>,
    /// Base URL for the API (default: https://api.moltin.com).
    pub base_url: String,
    /// Flow slug holding pizzeria entries.
    pub pizzeria_flow: String,
    /// Flow slug receiving customer addresses.
    pub customer_address_flow: String,
    pub timeout: Duration,
}

impl MoltinConfig {
    pub fn new(client_id: impl Into<String>, client_secret: Secret<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            base_url: "https://api.moltin.com".to_string(),
            pizzeria_flow: "pizzeria".to_string(),
            customer_address_flow: "customer_address".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_flows(
        mut self,
        pizzeria_flow: impl Into<String>,
        customer_address_flow: impl Into<String>,
    ) -> Self {
        self.pizzeria_flow = pizzeria_flow.into();
        self.customer_address_flow = customer_address_flow.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Store backend over the Moltin REST API.
pub struct MoltinCatalogClient {
    config: MoltinConfig,
    http: Client,
    credentials: CredentialCache,
}

impl MoltinCatalogClient {
    pub fn new(config: MoltinConfig) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(format!("HTTP client: {}", e)))?;
        let credentials = CredentialCache::new(
            http.clone(),
            format!("{}/oauth/access_token", config.base_url),
            config.client_id.clone(),
            config.client_secret.clone(),
        );
        Ok(Self {
            config,
            http,
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let request = self.credentials.authorize(self.http.get(self.url(path))).await?;
        let response = self.send(request, path).await?;
        decode(response, path).await
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<(), CatalogError> {
        let request = self
            .credentials
            .authorize(self.http.post(self.url(path)).json(&body))
            .await?;
        self.send(request, path).await.map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<(), CatalogError> {
        let request = self.credentials.authorize(self.http.delete(self.url(path))).await?;
        self.send(request, path).await.map(|_| ())
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<Response, CatalogError> {
        tracing::debug!(path, "Catalog request");
        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("{}: {}", path, e)))?;

        match map_status(response.status(), path) {
            Ok(()) => Ok(response),
            Err(CatalogError::Unauthorized(message)) => {
                self.credentials.invalidate().await;
                Err(CatalogError::Unauthorized(message))
            }
            Err(e) => Err(e),
        }
    }

    async fn pizzerias(&self) -> Result<Vec<PizzeriaLocation>, CatalogError> {
        let path = format!("/v2/flows/{}/entries", self.config.pizzeria_flow);
        let envelope: Envelope<Vec<Value>> = self.get(&path).await?;
        Ok(parse_pizzerias(&envelope.data))
    }
}

fn map_status(status: StatusCode, path: &str) -> Result<(), CatalogError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(CatalogError::Unauthorized(format!("{} returned {}", path, status)))
        }
        StatusCode::NOT_FOUND => Err(CatalogError::NotFound(path.to_string())),
        _ => Err(CatalogError::Unavailable(format!("{} returned {}", path, status))),
    }
}

async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, CatalogError> {
    response
        .json()
        .await
        .map_err(|e| CatalogError::InvalidResponse(format!("{}: {}", path, e)))
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ProductData {
    id: String,
    attributes: Named,
}

#[derive(Debug, Deserialize)]
struct FormattedPrice {
    formatted: String,
}

#[derive(Debug, Deserialize)]
struct DisplayPriceWithoutTax {
    without_tax: FormattedPrice,
}

#[derive(Debug, Deserialize)]
struct ProductMeta {
    display_price: DisplayPriceWithoutTax,
}

#[derive(Debug, Deserialize)]
struct ProductDetailData {
    id: String,
    attributes: Named,
    meta: ProductMeta,
}

#[derive(Debug, Deserialize)]
struct RelationshipData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Deserialize)]
struct FileData {
    link: Link,
}

#[derive(Debug, Deserialize)]
struct LineValue {
    value: FormattedPrice,
}

#[derive(Debug, Deserialize)]
struct LineDisplayPrice {
    with_tax: LineValue,
}

#[derive(Debug, Deserialize)]
struct LineMeta {
    display_price: LineDisplayPrice,
}

#[derive(Debug, Deserialize)]
struct CartItemData {
    id: String,
    #[serde(default)]
    product_id: String,
    name: String,
    #[serde(default)]
    description: String,
    quantity: u32,
    meta: LineMeta,
}

#[derive(Debug, Deserialize)]
struct CartDisplayPrice {
    with_tax: FormattedPrice,
}

#[derive(Debug, Deserialize)]
struct CartMeta {
    display_price: CartDisplayPrice,
}

#[derive(Debug, Deserialize)]
struct CartData {
    meta: CartMeta,
}

impl From<CartItemData> for CartLine {
    fn from(item: CartItemData) -> Self {
        CartLine {
            id: item.id,
            product_id: item.product_id,
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            formatted_total: item.meta.display_price.with_tax.value.formatted,
        }
    }
}

/// Flow fields may hold numbers or numeric strings.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn chat_id(value: &Value) -> Option<UserId> {
    match value {
        Value::Number(n) => n.as_i64().map(UserId::new),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn parse_pizzeria(entry: &Value) -> Option<PizzeriaLocation> {
    let address = entry.get("address")?.as_str()?.to_string();
    let latitude = number(entry.get("lat")?)?;
    let longitude = number(entry.get("lon")?)?;
    let coordinates = Coordinates::new(latitude, longitude).ok()?;
    Some(PizzeriaLocation {
        address,
        coordinates,
        courier: entry.get("chat_id").and_then(chat_id),
    })
}

/// Entries without a usable address or position are skipped.
fn parse_pizzerias(entries: &[Value]) -> Vec<PizzeriaLocation> {
    entries
        .iter()
        .filter_map(|entry| {
            let parsed = parse_pizzeria(entry);
            if parsed.is_none() {
                tracing::warn!(entry = %entry, "Skipping malformed pizzeria entry");
            }
            parsed
        })
        .collect()
}

#[async_trait]
impl CatalogClient for MoltinCatalogClient {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let envelope: Envelope<Vec<ProductData>> = self.get("/pcm/products").await?;
        Ok(envelope
            .data
            .into_iter()
            .map(|p| Product {
                id: p.id,
                name: p.attributes.name,
            })
            .collect())
    }

    async fn get_product(&self, product_id: &str) -> Result<ProductDetail, CatalogError> {
        let path = format!("/catalog/products/{}", product_id);
        let envelope: Envelope<ProductDetailData> = self.get(&path).await?;
        let product = envelope.data;
        Ok(ProductDetail {
            id: product.id,
            name: product.attributes.name,
            description: product.attributes.description,
            formatted_price: product.meta.display_price.without_tax.formatted,
        })
    }

    async fn get_image_url(&self, product_id: &str) -> Result<Option<String>, CatalogError> {
        let path = format!("/pcm/products/{}/relationships/main_image", product_id);
        let relationship: Envelope<Option<RelationshipData>> = match self.get(&path).await {
            Ok(r) => r,
            Err(CatalogError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let Some(file) = relationship.data else {
            return Ok(None);
        };

        let file: Envelope<FileData> = self.get(&format!("/v2/files/{}", file.id)).await?;
        Ok(Some(file.data.link.href))
    }

    async fn add_to_cart(
        &self,
        cart: UserId,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), CatalogError> {
        let body = json!({
            "data": {
                "id": product_id,
                "type": "cart_item",
                "quantity": quantity,
            }
        });
        self.post_json(&format!("/v2/carts/{}/items", cart), body).await
    }

    async fn remove_from_cart(&self, cart: UserId, line_id: &str) -> Result<(), CatalogError> {
        self.delete(&format!("/v2/carts/{}/items/{}", cart, line_id)).await
    }

    async fn list_cart_lines(&self, cart: UserId) -> Result<Vec<CartLine>, CatalogError> {
        let envelope: Envelope<Vec<CartItemData>> =
            self.get(&format!("/v2/carts/{}/items", cart)).await?;
        Ok(envelope.data.into_iter().map(CartLine::from).collect())
    }

    async fn get_cart_total(&self, cart: UserId) -> Result<String, CatalogError> {
        let envelope: Envelope<CartData> = self.get(&format!("/v2/carts/{}", cart)).await?;
        Ok(envelope.data.meta.display_price.with_tax.formatted)
    }

    async fn list_pizzerias(&self) -> Result<Vec<PizzeriaLocation>, CatalogError> {
        self.pizzerias().await
    }

    async fn resolve_courier_for_address(&self, address: &str) -> Result<UserId, CatalogError> {
        self.pizzerias()
            .await?
            .into_iter()
            .filter(|p| p.address == address)
            .find_map(|p| p.courier)
            .ok_or_else(|| CatalogError::CourierNotFound(address.to_string()))
    }

    async fn create_customer_address(
        &self,
        customer: UserId,
        coordinates: Coordinates,
    ) -> Result<(), CatalogError> {
        let body = json!({
            "data": {
                "type": "entry",
                "chat_id": customer.as_i64(),
                "lat": coordinates.latitude(),
                "lon": coordinates.longitude(),
            }
        });
        let path = format!("/v2/flows/{}/entries", self.config.customer_address_flow);
        self.post_json(&path, body).await
    }
}
