// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{product_id_from_json, CartLine};

/// Who is checking out. Missing fields deserialize as empty strings so the
/// checkout validation can report them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
}

impl CustomerInfo {
  pub fn is_complete(&self) -> bool {
    !self.name.trim().is_empty() && !self.email.trim().is_empty()
  }
}

/// One line of the cart snapshot a client submits at checkout.
///
/// Accepts the `GET /api/cart` row shape; only the product reference and the
/// quantity are used, the price is re-read from the catalog.
///
/// The product may be sent as `product_id` or `productId`, as a string or a
/// number. When both keys are present `product_id` wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CheckoutLineWire")]
pub struct CheckoutLine {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub product_id: Option<String>,
  pub quantity: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub price: Option<f64>,
}

#[derive(Deserialize)]
struct CheckoutLineWire {
  #[serde(default)]
  id: Option<Value>,
  #[serde(default)]
  product_id: Option<Value>,
  #[serde(default, rename = "productId")]
  product_id_camel: Option<Value>,
  #[serde(default)]
  quantity: Option<i64>,
  #[serde(default)]
  price: Option<f64>,
}

impl From<CheckoutLineWire> for CheckoutLine {
  fn from(wire: CheckoutLineWire) -> Self {
    let product_id = wire
      .product_id
      .as_ref()
      .and_then(product_id_from_json)
      .or_else(|| wire.product_id_camel.as_ref().and_then(product_id_from_json));
    Self {
      id: wire.id.as_ref().and_then(product_id_from_json),
      product_id,
      quantity: wire.quantity,
      price: wire.price,
    }
  }
}

impl From<&CartLine> for CheckoutLine {
  fn from(line: &CartLine) -> Self {
    Self {
      id: Some(line.id.to_string()),
      product_id: Some(line.product_id.clone()),
      quantity: Some(i64::from(line.quantity)),
      price: Some(line.price),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
  pub product_id: String,
  pub name: String,
  pub price: f64,
  pub quantity: u32,
  pub item_total: f64,
}

/// Checkout confirmation. Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
  pub order_id: Uuid,
  pub customer: CustomerInfo,
  pub items: Vec<ReceiptLine>,
  pub total: f64,
  pub timestamp: DateTime<Utc>,
}
