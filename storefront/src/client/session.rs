// storefront/src/client/session.rs

//! Client-side view state.
//!
//! Every mutating action issues its request and then re-reads the cart from
//! the server; nothing is applied optimistically. While one action is in
//! flight the session is `loading` and refuses further actions with
//! [`ActionOutcome::Busy`]. Failures surface as an alert text in
//! [`SessionState::last_alert`].

use futures_util::future::join;
use parking_lot::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::api::{ClientError, ShopApi};
use crate::models::{CartSummary, CheckoutLine, CustomerInfo, Product, Receipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
  #[default]
  Products,
  Cart,
  Checkout,
  Receipt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
  Done,
  /// Another action was still in flight; nothing was sent.
  Busy,
  /// The action failed or was refused; the text is shown to the shopper.
  Alerted(String),
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
  pub view: View,
  pub products: Vec<Product>,
  pub cart: CartSummary,
  pub customer: CustomerInfo,
  pub receipt: Option<Receipt>,
  pub loading: bool,
  pub last_alert: Option<String>,
}

pub struct StorefrontSession<A: ShopApi> {
  api: A,
  state: Mutex<SessionState>,
}

impl<A: ShopApi> StorefrontSession<A> {
  pub fn new(api: A) -> Self {
    Self {
      api,
      state: Mutex::new(SessionState::default()),
    }
  }

  pub fn api(&self) -> &A {
    &self.api
  }

  /// A copy of the current state, for rendering.
  pub fn snapshot(&self) -> SessionState {
    self.state.lock().clone()
  }

  /// Fetches products and cart side by side. Failures are logged only.
  #[instrument(name = "session::load", skip(self))]
  pub async fn load(&self) {
    let (products, cart) = join(self.api.list_products(), self.api.get_cart()).await;

    let mut state = self.state.lock();
    match products {
      Ok(products) => state.products = products,
      Err(e) => warn!(error = %e, "Error getting products."),
    }
    match cart {
      Ok(cart) => state.cart = cart,
      Err(e) => warn!(error = %e, "Error getting cart."),
    }
  }

  pub fn show(&self, view: View) {
    self.state.lock().view = view;
  }

  pub fn begin_checkout(&self) {
    self.show(View::Checkout);
  }

  pub fn set_customer(&self, name: impl Into<String>, email: impl Into<String>) {
    self.state.lock().customer = CustomerInfo {
      name: name.into(),
      email: email.into(),
    };
  }

  #[instrument(name = "session::add_to_cart", skip(self))]
  pub async fn add_to_cart(&self, product_id: &str) -> ActionOutcome {
    if !self.begin() {
      return ActionOutcome::Busy;
    }
    let outcome = match self.api.add_to_cart(product_id, 1).await {
      Ok(_) => ActionOutcome::Done,
      Err(e) => self.alert("Error adding to cart", &e),
    };
    self.finish().await;
    outcome
  }

  #[instrument(name = "session::remove_from_cart", skip(self))]
  pub async fn remove_from_cart(&self, cart_item_id: Uuid) -> ActionOutcome {
    if !self.begin() {
      return ActionOutcome::Busy;
    }
    let outcome = match self.api.remove_from_cart(cart_item_id).await {
      Ok(()) => ActionOutcome::Done,
      Err(e) => self.alert("Error removing item", &e),
    };
    self.finish().await;
    outcome
  }

  /// Sets a line's quantity. Anything below 1 removes the line instead.
  #[instrument(name = "session::update_quantity", skip(self))]
  pub async fn update_quantity(&self, cart_item_id: Uuid, quantity: i64) -> ActionOutcome {
    if quantity < 1 {
      return self.remove_from_cart(cart_item_id).await;
    }
    let Ok(quantity) = u32::try_from(quantity) else {
      warn!(quantity, "Quantity does not fit a cart line.");
      return self.refuse("Quantity is too large");
    };
    if !self.begin() {
      return ActionOutcome::Busy;
    }
    let outcome = match self.api.update_quantity(cart_item_id, quantity).await {
      Ok(()) => ActionOutcome::Done,
      Err(e) => self.alert("Error updating quantity", &e),
    };
    self.finish().await;
    outcome
  }

  /// Submits the current cart with the entered customer details.
  ///
  /// A blank name or email is refused locally without a request.
  #[instrument(name = "session::submit_checkout", skip(self))]
  pub async fn submit_checkout(&self) -> ActionOutcome {
    let (lines, customer) = {
      let state = self.state.lock();
      let lines: Vec<CheckoutLine> = state.cart.items.iter().map(CheckoutLine::from).collect();
      (lines, state.customer.clone())
    };

    if !customer.is_complete() {
      return self.refuse("Please fill name and email");
    }
    if !self.begin() {
      return ActionOutcome::Busy;
    }

    let outcome = match self.api.checkout(lines, customer).await {
      Ok(receipt) => {
        info!(order_id = %receipt.order_id, total = receipt.total, "Order placed.");
        let mut state = self.state.lock();
        state.receipt = Some(receipt);
        state.view = View::Receipt;
        state.customer = CustomerInfo::default();
        ActionOutcome::Done
      }
      Err(e) => self.alert("Error during checkout", &e),
    };
    self.finish().await;
    outcome
  }

  /// Takes the loading flag. `false` when an action already holds it.
  fn begin(&self) -> bool {
    let mut state = self.state.lock();
    if state.loading {
      return false;
    }
    state.loading = true;
    state.last_alert = None;
    true
  }

  /// Re-reads the cart and releases the loading flag, whatever the action's
  /// result was.
  async fn finish(&self) {
    let cart = self.api.get_cart().await;
    let mut state = self.state.lock();
    match cart {
      Ok(cart) => state.cart = cart,
      Err(e) => warn!(error = %e, "Error getting cart."),
    }
    state.loading = false;
  }

  fn alert(&self, message: &str, err: &ClientError) -> ActionOutcome {
    warn!(error = %err, "{}", message);
    self.refuse(message)
  }

  /// Records `message` as the alert to show.
  fn refuse(&self, message: &str) -> ActionOutcome {
    self.state.lock().last_alert = Some(message.to_string());
    ActionOutcome::Alerted(message.to_string())
  }
}
