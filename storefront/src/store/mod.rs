// storefront/src/store/mod.rs

//! Data access for the catalog and the cart.
//!
//! Handlers and pipelines only see the [`ShopStore`] trait; the process wires
//! in [`InMemoryStore`]. Every method is atomic with respect to the others,
//! so an add-to-cart never loses a concurrent add for the same product.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CartItem, CartLine, Product};

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Catalog has already been seeded")]
  AlreadySeeded,

  #[error("Duplicate product id in catalog: {0}")]
  DuplicateProduct(String),

  #[error("Unknown product: {0}")]
  UnknownProduct(String),

  #[error("Quantity overflow for product {product_id}")]
  QuantityOverflow { product_id: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result of an add-to-cart upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct CartUpsert {
  pub item: CartItem,
  /// `true` when the line did not exist before this call.
  pub created: bool,
}

#[async_trait]
pub trait ShopStore: Send + Sync {
  /// Inserts the catalog. Succeeds once per store.
  async fn seed_products(&self, products: Vec<Product>) -> StoreResult<usize>;

  /// All products, in seed order.
  async fn list_products(&self) -> StoreResult<Vec<Product>>;

  async fn find_product(&self, product_id: &str) -> StoreResult<Option<Product>>;

  /// Creates the line for `product_id` or adds `quantity` to the existing one.
  async fn add_to_cart(&self, product_id: &str, quantity: u32) -> StoreResult<CartUpsert>;

  /// Sets a line's quantity; `0` removes it. `None` when the line does not exist.
  async fn set_cart_quantity(&self, cart_item_id: Uuid, quantity: u32) -> StoreResult<Option<CartItem>>;

  /// Deletes a line. Returns whether it existed.
  async fn remove_cart_item(&self, cart_item_id: Uuid) -> StoreResult<bool>;

  /// Cart lines joined with their products, in insertion order.
  async fn cart_lines(&self) -> StoreResult<Vec<CartLine>>;

  /// Empties the cart. Returns how many lines were removed.
  async fn clear_cart(&self) -> StoreResult<usize>;
}
