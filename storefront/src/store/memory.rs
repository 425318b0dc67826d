// storefront/src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{CartUpsert, ShopStore, StoreError, StoreResult};
use crate::models::{CartItem, CartLine, Product};

#[derive(Default)]
struct Catalog {
  seeded: bool,
  products: Vec<Product>,
  by_id: HashMap<String, usize>,
}

#[derive(Default)]
struct Cart {
  next_seq: u64,
  // cart item id -> (insertion sequence, item)
  items: HashMap<Uuid, (u64, CartItem)>,
  // product id -> cart item id; at most one line per product
  by_product: HashMap<String, Uuid>,
}

impl Cart {
  fn remove(&mut self, cart_item_id: Uuid) -> Option<CartItem> {
    let (_, item) = self.items.remove(&cart_item_id)?;
    self.by_product.remove(&item.product_id);
    Some(item)
  }
}

/// Process-memory store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
  catalog: RwLock<Catalog>,
  cart: RwLock<Cart>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ShopStore for InMemoryStore {
  #[instrument(name = "store::seed_products", skip_all, fields(count = products.len()))]
  async fn seed_products(&self, products: Vec<Product>) -> StoreResult<usize> {
    let mut catalog = self.catalog.write();
    if catalog.seeded {
      return Err(StoreError::AlreadySeeded);
    }

    let mut by_id = HashMap::with_capacity(products.len());
    for (idx, product) in products.iter().enumerate() {
      if by_id.insert(product.id.clone(), idx).is_some() {
        return Err(StoreError::DuplicateProduct(product.id.clone()));
      }
    }

    let count = products.len();
    catalog.products = products;
    catalog.by_id = by_id;
    catalog.seeded = true;
    Ok(count)
  }

  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    Ok(self.catalog.read().products.clone())
  }

  async fn find_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
    let catalog = self.catalog.read();
    Ok(catalog.by_id.get(product_id).map(|&idx| catalog.products[idx].clone()))
  }

  #[instrument(name = "store::add_to_cart", skip(self))]
  async fn add_to_cart(&self, product_id: &str, quantity: u32) -> StoreResult<CartUpsert> {
    if !self.catalog.read().by_id.contains_key(product_id) {
      return Err(StoreError::UnknownProduct(product_id.to_string()));
    }

    let mut cart = self.cart.write();
    if let Some(existing_id) = cart.by_product.get(product_id).copied() {
      if let Some((_, item)) = cart.items.get_mut(&existing_id) {
        item.quantity = item
          .quantity
          .checked_add(quantity)
          .ok_or_else(|| StoreError::QuantityOverflow {
            product_id: product_id.to_string(),
          })?;
        debug!(cart_item_id = %item.id, new_quantity = item.quantity, "Accumulated cart line.");
        return Ok(CartUpsert {
          item: item.clone(),
          created: false,
        });
      }
    }

    let item = CartItem {
      id: Uuid::new_v4(),
      product_id: product_id.to_string(),
      quantity,
      added_at: Utc::now(),
    };
    let seq = cart.next_seq;
    cart.next_seq += 1;
    cart.by_product.insert(item.product_id.clone(), item.id);
    cart.items.insert(item.id, (seq, item.clone()));
    debug!(cart_item_id = %item.id, "Created cart line.");
    Ok(CartUpsert { item, created: true })
  }

  #[instrument(name = "store::set_cart_quantity", skip(self))]
  async fn set_cart_quantity(&self, cart_item_id: Uuid, quantity: u32) -> StoreResult<Option<CartItem>> {
    let mut cart = self.cart.write();
    if quantity == 0 {
      return Ok(cart.remove(cart_item_id).map(|mut item| {
        item.quantity = 0;
        item
      }));
    }
    Ok(cart.items.get_mut(&cart_item_id).map(|(_, item)| {
      item.quantity = quantity;
      item.clone()
    }))
  }

  #[instrument(name = "store::remove_cart_item", skip(self))]
  async fn remove_cart_item(&self, cart_item_id: Uuid) -> StoreResult<bool> {
    Ok(self.cart.write().remove(cart_item_id).is_some())
  }

  async fn cart_lines(&self) -> StoreResult<Vec<CartLine>> {
    // Catalog before cart, the same order add_to_cart takes the locks in.
    let catalog = self.catalog.read();
    let cart = self.cart.read();

    let mut rows: Vec<&(u64, CartItem)> = cart.items.values().collect();
    rows.sort_by_key(|(seq, _)| *seq);

    // Inner join: a line whose product is missing is not shown.
    Ok(
      rows
        .into_iter()
        .filter_map(|(_, item)| {
          let idx = catalog.by_id.get(&item.product_id)?;
          Some(CartLine::join(item, &catalog.products[*idx]))
        })
        .collect(),
    )
  }

  #[instrument(name = "store::clear_cart", skip(self))]
  async fn clear_cart(&self) -> StoreResult<usize> {
    let mut cart = self.cart.write();
    let removed = cart.items.len();
    cart.items.clear();
    cart.by_product.clear();
    Ok(removed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  fn product(id: &str, price: f64) -> Product {
    Product {
      id: id.to_string(),
      name: format!("Product {}", id),
      price,
      image: format!("https://img.example/{}.png", id),
      description: String::new(),
    }
  }

  async fn seeded() -> InMemoryStore {
    let store = InMemoryStore::new();
    store
      .seed_products(vec![product("1", 99.99), product("2", 19.5), product("3", 0.0)])
      .await
      .unwrap();
    store
  }

  #[tokio::test]
  async fn seeding_happens_once() {
    let store = seeded().await;
    assert!(matches!(
      store.seed_products(vec![product("9", 1.0)]).await,
      Err(StoreError::AlreadySeeded)
    ));
    let ids: Vec<String> = store.list_products().await.unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
  }

  #[tokio::test]
  async fn duplicate_ids_are_rejected() {
    let store = InMemoryStore::new();
    let err = store
      .seed_products(vec![product("1", 1.0), product("1", 2.0)])
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateProduct(id) if id == "1"));
  }

  #[tokio::test]
  async fn repeat_add_accumulates_one_line() {
    let store = seeded().await;
    let first = store.add_to_cart("1", 2).await.unwrap();
    let second = store.add_to_cart("1", 3).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.item.id, second.item.id);

    let lines = store.cart_lines().await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 5);
    assert_eq!(lines[0].item_total, 5.0 * 99.99);
  }

  #[tokio::test]
  async fn unknown_product_is_rejected() {
    let store = seeded().await;
    assert!(matches!(
      store.add_to_cart("404", 1).await,
      Err(StoreError::UnknownProduct(id)) if id == "404"
    ));
    assert!(store.cart_lines().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn overflow_leaves_quantity_untouched() {
    let store = seeded().await;
    store.add_to_cart("2", u32::MAX).await.unwrap();
    assert!(matches!(
      store.add_to_cart("2", 1).await,
      Err(StoreError::QuantityOverflow { .. })
    ));
    assert_eq!(store.cart_lines().await.unwrap()[0].quantity, u32::MAX);
  }

  #[tokio::test]
  async fn set_quantity_updates_in_place_or_removes() {
    let store = seeded().await;
    let line = store.add_to_cart("2", 1).await.unwrap().item;

    let updated = store.set_cart_quantity(line.id, 4).await.unwrap().unwrap();
    assert_eq!(updated.id, line.id);
    assert_eq!(updated.quantity, 4);

    let removed = store.set_cart_quantity(line.id, 0).await.unwrap().unwrap();
    assert_eq!(removed.quantity, 0);
    assert!(store.cart_lines().await.unwrap().is_empty());

    assert!(store.set_cart_quantity(line.id, 2).await.unwrap().is_none());

    // The product slot is free again after removal.
    assert!(store.add_to_cart("2", 1).await.unwrap().created);
  }

  #[tokio::test]
  async fn removing_unknown_line_is_a_no_op() {
    let store = seeded().await;
    store.add_to_cart("1", 1).await.unwrap();
    assert!(!store.remove_cart_item(Uuid::new_v4()).await.unwrap());
    assert_eq!(store.cart_lines().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn lines_keep_insertion_order_and_clear_empties() {
    let store = seeded().await;
    store.add_to_cart("3", 1).await.unwrap();
    store.add_to_cart("1", 1).await.unwrap();
    store.add_to_cart("2", 1).await.unwrap();
    store.add_to_cart("3", 1).await.unwrap();

    let order: Vec<String> = store
      .cart_lines()
      .await
      .unwrap()
      .into_iter()
      .map(|l| l.product_id)
      .collect();
    assert_eq!(order, vec!["3", "1", "2"]);

    assert_eq!(store.clear_cart().await.unwrap(), 3);
    assert!(store.cart_lines().await.unwrap().is_empty());
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_adds_do_not_lose_updates() {
    let store = Arc::new(seeded().await);
    let mut tasks = Vec::new();
    for _ in 0..50 {
      let store = Arc::clone(&store);
      tasks.push(tokio::spawn(async move { store.add_to_cart("1", 2).await }));
    }
    for task in tasks {
      task.await.unwrap().unwrap();
    }
    let lines = store.cart_lines().await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 100);
  }
}
