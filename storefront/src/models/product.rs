// storefront/src/models/product.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A catalog entry. Immutable once the catalog is seeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub price: f64,
  pub image: String,
  pub description: String,
}

/// Reads a product reference sent by a client. Strings and numbers are
/// accepted; any other JSON type counts as missing.
pub fn product_id_from_json(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}
