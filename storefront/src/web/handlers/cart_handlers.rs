// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use cartflow::ContextData;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::run_to_completion;
use crate::errors::AppError;
use crate::models::{product_id_from_json, CartSummary};
use crate::pipelines::contexts::{AddToCartCtxData, UpdateCartQuantityCtxData};
use crate::state::AppState;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  // String or number; anything else counts as missing.
  #[serde(rename = "productId", default)]
  pub product_id: Option<Value>,
  #[serde(default)]
  pub quantity: Option<i64>,
}

impl AddToCartRequestPayload {
  fn product_id(&self) -> Option<String> {
    self.product_id.as_ref().and_then(product_id_from_json)
  }
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityRequestPayload {
  #[serde(default)]
  pub quantity: Option<i64>,
}

// --- Handlers ---

#[instrument(name = "handler::view_cart", skip(app_state))]
pub async fn view_cart_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let lines = app_state.store.cart_lines().await?;
  let summary = CartSummary::from_lines(lines);
  debug!(lines = summary.items.len(), item_count = summary.item_count, total = summary.total, "Cart read.");
  Ok(HttpResponse::Ok().json(summary))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload),
  fields(product_id = ?req_payload.product_id, quantity = ?req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(AddToCartCtxData::new(
    app_state.get_ref().clone(),
    req_payload.product_id(),
    req_payload.quantity,
  ));

  run_to_completion(&app_state, ctx_data.clone()).await?;

  let outcome = ctx_data.read().outcome.clone().ok_or_else(|| {
    AppError::Internal("Cart update completed, but the stored line is unavailable.".to_string())
  })?;
  let message = if outcome.created { "Item added to cart" } else { "Cart updated" };
  info!(cart_item_id = %outcome.item.id, quantity = outcome.item.quantity, "{}", message);

  Ok(HttpResponse::Ok().json(json!({
    "message": message,
    "cartItemId": outcome.item.id,
  })))
}

#[instrument(name = "handler::update_cart_item", skip(app_state, path, req_payload), fields(cart_item_id = %path.as_ref()))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<UpdateQuantityRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let cart_item_id = Uuid::parse_str(path.trim())
    .map_err(|_| AppError::Validation(format!("Invalid cart item id '{}'", path.as_str())))?;

  let ctx_data = ContextData::new(UpdateCartQuantityCtxData::new(
    app_state.get_ref().clone(),
    cart_item_id,
    req_payload.quantity,
  ));

  run_to_completion(&app_state, ctx_data.clone()).await?;

  let quantity = ctx_data.read().quantity;
  let message = if quantity == 0 { "Item removed" } else { "Cart updated" };
  Ok(HttpResponse::Ok().json(json!({
    "message": message,
    "cartItemId": cart_item_id,
    "quantity": quantity,
  })))
}

/// Deleting a line that does not exist, or an id that is not even a UUID,
/// still succeeds.
#[instrument(name = "handler::remove_from_cart", skip(app_state, path), fields(cart_item_id = %path.as_ref()))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let existed = match Uuid::parse_str(path.trim()) {
    Ok(cart_item_id) => app_state.store.remove_cart_item(cart_item_id).await?,
    Err(_) => false,
  };
  debug!(existed, "Remove from cart processed.");

  Ok(HttpResponse::Ok().json(json!({ "message": "Item removed" })))
}
