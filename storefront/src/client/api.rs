// storefront/src/client/api.rs

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::models::{CartSummary, CheckoutLine, CustomerInfo, Product, Receipt};

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("HTTP transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("API error ({status}): {message}")]
  Api { status: u16, message: String },
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// The storefront HTTP API as seen by a client.
#[async_trait]
pub trait ShopApi: Send + Sync {
  async fn list_products(&self) -> ClientResult<Vec<Product>>;

  async fn get_cart(&self) -> ClientResult<CartSummary>;

  /// Returns the id of the created or updated cart line.
  async fn add_to_cart(&self, product_id: &str, quantity: u32) -> ClientResult<Uuid>;

  async fn update_quantity(&self, cart_item_id: Uuid, quantity: u32) -> ClientResult<()>;

  async fn remove_from_cart(&self, cart_item_id: Uuid) -> ClientResult<()>;

  async fn checkout(&self, lines: Vec<CheckoutLine>, customer: CustomerInfo) -> ClientResult<Receipt>;
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartResponse {
  cart_item_id: Uuid,
}

/// [`ShopApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpShopApi {
  http: reqwest::Client,
  base_url: String,
}

impl HttpShopApi {
  /// `base_url` is the server origin, e.g. `http://127.0.0.1:5000`.
  pub fn new(base_url: impl Into<String>) -> Self {
    Self::with_client(reqwest::Client::new(), base_url)
  }

  pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self { http, base_url }
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url, path)
  }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp.json().await?);
  }

  let text = resp.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ErrorBody>(&text)
    .map(|body| body.error)
    .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
  debug!(status = status.as_u16(), %message, "API call failed.");
  Err(ClientError::Api {
    status: status.as_u16(),
    message,
  })
}

#[async_trait]
impl ShopApi for HttpShopApi {
  #[instrument(name = "client::list_products", skip(self))]
  async fn list_products(&self) -> ClientResult<Vec<Product>> {
    let resp = self.http.get(self.url("/products")).send().await?;
    decode(resp).await
  }

  #[instrument(name = "client::get_cart", skip(self))]
  async fn get_cart(&self) -> ClientResult<CartSummary> {
    let resp = self.http.get(self.url("/cart")).send().await?;
    decode(resp).await
  }

  #[instrument(name = "client::add_to_cart", skip(self))]
  async fn add_to_cart(&self, product_id: &str, quantity: u32) -> ClientResult<Uuid> {
    let resp = self
      .http
      .post(self.url("/cart"))
      .json(&json!({ "productId": product_id, "quantity": quantity }))
      .send()
      .await?;
    let body: AddToCartResponse = decode(resp).await?;
    Ok(body.cart_item_id)
  }

  #[instrument(name = "client::update_quantity", skip(self))]
  async fn update_quantity(&self, cart_item_id: Uuid, quantity: u32) -> ClientResult<()> {
    let resp = self
      .http
      .put(self.url(&format!("/cart/{}", cart_item_id)))
      .json(&json!({ "quantity": quantity }))
      .send()
      .await?;
    decode::<serde_json::Value>(resp).await.map(|_| ())
  }

  #[instrument(name = "client::remove_from_cart", skip(self))]
  async fn remove_from_cart(&self, cart_item_id: Uuid) -> ClientResult<()> {
    let resp = self
      .http
      .delete(self.url(&format!("/cart/{}", cart_item_id)))
      .send()
      .await?;
    decode::<serde_json::Value>(resp).await.map(|_| ())
  }

  #[instrument(name = "client::checkout", skip(self, lines, customer), fields(lines = lines.len()))]
  async fn checkout(&self, lines: Vec<CheckoutLine>, customer: CustomerInfo) -> ClientResult<Receipt> {
    let resp = self
      .http
      .post(self.url("/checkout"))
      .json(&json!({ "cartItems": lines, "customerInfo": customer }))
      .send()
      .await?;
    decode(resp).await
  }
}
