// storefront/tests/session_tests.rs

mod common;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

use common::{approx_eq, catalog_product, seeded_state};
use storefront::client::{ActionOutcome, ClientError, ClientResult, HttpShopApi, ShopApi, StorefrontSession, View};
use storefront::models::{CartLine, CartSummary, CheckoutLine, CustomerInfo, Product, Receipt};
use storefront::services::catalog::fallback_catalog;
use storefront::store::ShopStore;
use storefront::web::configure_app_routes;

/// In-memory stand-in for the HTTP API. Records every call, can be told to
/// fail mutations, and can hold `add_to_cart` until released.
#[derive(Default)]
struct ScriptedApi {
  lines: Mutex<Vec<CartLine>>,
  calls: Mutex<Vec<&'static str>>,
  fail_mutations: bool,
  hold_adds: bool,
  release: Notify,
}

impl ScriptedApi {
  fn failing() -> Self {
    Self {
      fail_mutations: true,
      ..Self::default()
    }
  }

  fn holding() -> Self {
    Self {
      hold_adds: true,
      ..Self::default()
    }
  }

  fn calls(&self) -> Vec<&'static str> {
    self.calls.lock().clone()
  }

  fn record(&self, call: &'static str) -> ClientResult<()> {
    self.calls.lock().push(call);
    if self.fail_mutations && call != "get_cart" && call != "list_products" {
      return Err(ClientError::Api {
        status: 500,
        message: "Store operation failed".to_string(),
      });
    }
    Ok(())
  }
}

#[async_trait]
impl ShopApi for ScriptedApi {
  async fn list_products(&self) -> ClientResult<Vec<Product>> {
    self.record("list_products")?;
    Ok(fallback_catalog())
  }

  async fn get_cart(&self) -> ClientResult<CartSummary> {
    self.record("get_cart")?;
    Ok(CartSummary::from_lines(self.lines.lock().clone()))
  }

  async fn add_to_cart(&self, product_id: &str, quantity: u32) -> ClientResult<Uuid> {
    if self.hold_adds {
      self.release.notified().await;
    }
    self.record("add_to_cart")?;
    let product = catalog_product(product_id);
    let id = Uuid::new_v4();
    self.lines.lock().push(CartLine {
      id,
      quantity,
      product_id: product.id,
      name: product.name,
      price: product.price,
      image: product.image,
      item_total: product.price * f64::from(quantity),
    });
    Ok(id)
  }

  async fn update_quantity(&self, cart_item_id: Uuid, quantity: u32) -> ClientResult<()> {
    self.record("update_quantity")?;
    if let Some(line) = self.lines.lock().iter_mut().find(|l| l.id == cart_item_id) {
      line.quantity = quantity;
      line.item_total = line.price * f64::from(quantity);
    }
    Ok(())
  }

  async fn remove_from_cart(&self, cart_item_id: Uuid) -> ClientResult<()> {
    self.record("remove_from_cart")?;
    self.lines.lock().retain(|l| l.id != cart_item_id);
    Ok(())
  }

  async fn checkout(&self, lines: Vec<CheckoutLine>, customer: CustomerInfo) -> ClientResult<Receipt> {
    self.record("checkout")?;
    assert!(!lines.is_empty());
    let total = self.lines.lock().iter().map(|l| l.item_total).sum();
    self.lines.lock().clear();
    Ok(Receipt {
      order_id: Uuid::new_v4(),
      customer,
      items: Vec::new(),
      total,
      timestamp: Utc::now(),
    })
  }
}

#[tokio::test]
async fn load_fills_products_and_cart() {
  let session = StorefrontSession::new(ScriptedApi::default());
  session.load().await;

  let state = session.snapshot();
  assert_eq!(state.view, View::Products);
  assert_eq!(state.products.len(), 8);
  assert!(state.cart.is_empty());
  assert!(!state.loading);
}

#[tokio::test]
async fn mutations_refetch_the_cart() {
  let session = StorefrontSession::new(ScriptedApi::default());

  assert_eq!(session.add_to_cart("2").await, ActionOutcome::Done);
  let state = session.snapshot();
  assert_eq!(state.cart.item_count, 1);
  assert!(!state.loading);
  assert_eq!(session.api().calls(), vec!["add_to_cart", "get_cart"]);

  let line_id = state.cart.items[0].id;
  assert_eq!(session.update_quantity(line_id, 3).await, ActionOutcome::Done);
  assert_eq!(session.snapshot().cart.item_count, 3);

  // Below one means removal.
  assert_eq!(session.update_quantity(line_id, 0).await, ActionOutcome::Done);
  assert!(session.snapshot().cart.is_empty());
  assert_eq!(
    session.api().calls(),
    vec!["add_to_cart", "get_cart", "update_quantity", "get_cart", "remove_from_cart", "get_cart"]
  );
}

#[tokio::test]
async fn failed_mutation_alerts_and_clears_loading() {
  let session = StorefrontSession::new(ScriptedApi::failing());

  let outcome = session.add_to_cart("1").await;
  assert_eq!(outcome, ActionOutcome::Alerted("Error adding to cart".to_string()));

  let state = session.snapshot();
  assert!(!state.loading);
  assert_eq!(state.last_alert.as_deref(), Some("Error adding to cart"));
  // The cart is re-read even though the mutation failed.
  assert_eq!(session.api().calls(), vec!["add_to_cart", "get_cart"]);
}

#[tokio::test]
async fn loading_gate_refuses_a_second_action() {
  let session = Arc::new(StorefrontSession::new(ScriptedApi::holding()));

  let first = {
    let session = session.clone();
    tokio::spawn(async move { session.add_to_cart("1").await })
  };
  while !session.snapshot().loading {
    tokio::task::yield_now().await;
  }

  assert_eq!(session.add_to_cart("2").await, ActionOutcome::Busy);
  assert_eq!(session.submit_checkout().await, ActionOutcome::Alerted("Please fill name and email".to_string()));
  session.set_customer("Ada", "ada@example.com");
  assert_eq!(session.submit_checkout().await, ActionOutcome::Busy);

  session.api().release.notify_one();
  assert_eq!(first.await.unwrap(), ActionOutcome::Done);

  let state = session.snapshot();
  assert!(!state.loading);
  assert_eq!(state.cart.items.len(), 1);
  assert_eq!(state.cart.items[0].product_id, "1");
}

#[tokio::test]
async fn blank_customer_is_refused_without_a_request() {
  let session = StorefrontSession::new(ScriptedApi::default());
  session.add_to_cart("1").await;
  session.begin_checkout();
  session.set_customer("Ada", "   ");

  let outcome = session.submit_checkout().await;
  assert_eq!(outcome, ActionOutcome::Alerted("Please fill name and email".to_string()));
  assert!(!session.api().calls().contains(&"checkout"));
  assert_eq!(session.snapshot().view, View::Checkout);
}

#[tokio::test]
async fn successful_checkout_shows_receipt_and_resets_form() {
  let session = StorefrontSession::new(ScriptedApi::default());
  session.add_to_cart("5").await;
  session.begin_checkout();
  session.set_customer("Ada", "ada@example.com");

  assert_eq!(session.submit_checkout().await, ActionOutcome::Done);

  let state = session.snapshot();
  assert_eq!(state.view, View::Receipt);
  assert_eq!(state.customer, CustomerInfo::default());
  assert!(state.cart.is_empty());
  let receipt = state.receipt.expect("receipt stored");
  assert_eq!(receipt.customer.name, "Ada");
  assert!(approx_eq(receipt.total, catalog_product("5").price));
}

#[tokio::test]
async fn failed_checkout_keeps_the_form() {
  let session = StorefrontSession::new(ScriptedApi::failing());
  session.begin_checkout();
  session.set_customer("Ada", "ada@example.com");

  let outcome = session.submit_checkout().await;
  assert_eq!(outcome, ActionOutcome::Alerted("Error during checkout".to_string()));

  let state = session.snapshot();
  assert_eq!(state.view, View::Checkout);
  assert_eq!(state.customer.name, "Ada");
  assert!(state.receipt.is_none());
  assert!(!state.loading);
}

#[actix_web::test]
async fn session_drives_a_running_server() {
  let state = seeded_state().await;
  let server_state = state.clone();
  let server = HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(server_state.clone()))
      .configure(configure_app_routes)
  })
  .workers(1)
  .bind(("127.0.0.1", 0))
  .unwrap();
  let addr = server.addrs()[0];
  let server = server.run();
  let handle = server.handle();
  actix_web::rt::spawn(server);

  let session = StorefrontSession::new(HttpShopApi::new(format!("http://{}", addr)));
  session.load().await;
  assert_eq!(session.snapshot().products.len(), 8);

  assert_eq!(session.add_to_cart("1").await, ActionOutcome::Done);
  assert_eq!(session.add_to_cart("1").await, ActionOutcome::Done);
  let cart = session.snapshot().cart;
  assert_eq!(cart.items.len(), 1);
  assert_eq!(cart.items[0].quantity, 2);

  assert_eq!(session.update_quantity(cart.items[0].id, 3).await, ActionOutcome::Done);
  assert_eq!(session.snapshot().cart.item_count, 3);

  session.begin_checkout();
  session.set_customer("Grace", "grace@example.com");
  assert_eq!(session.submit_checkout().await, ActionOutcome::Done);

  let after = session.snapshot();
  assert_eq!(after.view, View::Receipt);
  assert!(after.cart.is_empty());
  let receipt = after.receipt.expect("receipt stored");
  assert!(approx_eq(receipt.total, 3.0 * catalog_product("1").price));
  assert!(state.store.cart_lines().await.unwrap().is_empty());

  // Server-side errors come back as an alert.
  let api = session.api();
  match api.add_to_cart("999", 1).await {
    Err(ClientError::Api { status, message }) => {
      assert_eq!(status, 404);
      assert_eq!(message, "Product not found");
    }
    other => panic!("expected a 404, got {:?}", other),
  }

  handle.stop(true).await;
}

#[tokio::test]
async fn oversized_quantity_is_refused_without_a_request() {
  let session = StorefrontSession::new(ScriptedApi::default());
  session.add_to_cart("3").await;
  let line_id = session.snapshot().cart.items[0].id;

  let outcome = session.update_quantity(line_id, i64::from(u32::MAX) + 1).await;
  assert_eq!(outcome, ActionOutcome::Alerted("Quantity is too large".to_string()));

  let state = session.snapshot();
  assert_eq!(state.last_alert.as_deref(), Some("Quantity is too large"));
  assert_eq!(state.cart.items[0].quantity, 1);
  assert!(!state.loading);
  assert!(!session.api().calls().contains(&"update_quantity"));
}
