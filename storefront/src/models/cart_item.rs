// storefront/src/models/cart_item.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Product;

/// A stored cart line: one product and its accumulated quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: Uuid,
  pub product_id: String,
  pub quantity: u32,
  pub added_at: DateTime<Utc>,
}

/// A cart item joined with its product, as returned by `GET /api/cart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
  pub id: Uuid,
  pub quantity: u32,
  pub product_id: String,
  pub name: String,
  pub price: f64,
  pub image: String,
  pub item_total: f64,
}

impl CartLine {
  pub fn join(item: &CartItem, product: &Product) -> Self {
    Self {
      id: item.id,
      quantity: item.quantity,
      product_id: product.id.clone(),
      name: product.name.clone(),
      price: product.price,
      image: product.image.clone(),
      item_total: product.price * f64::from(item.quantity),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartSummary {
  pub items: Vec<CartLine>,
  pub total: f64,
  #[serde(rename = "itemCount")]
  pub item_count: u64,
}

impl CartSummary {
  pub fn from_lines(items: Vec<CartLine>) -> Self {
    let total = items.iter().map(|line| line.item_total).sum();
    let item_count = items.iter().map(|line| u64::from(line.quantity)).sum();
    Self {
      items,
      total,
      item_count,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}
