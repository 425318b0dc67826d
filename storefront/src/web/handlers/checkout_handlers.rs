// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use cartflow::ContextData;
use serde::Deserialize;
use tracing::{info, instrument};

use super::run_to_completion;
use crate::errors::AppError;
use crate::models::{CheckoutLine, CustomerInfo};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  #[serde(rename = "cartItems", default)]
  pub cart_items: Option<Vec<CheckoutLine>>,
  #[serde(rename = "customerInfo", default)]
  pub customer_info: Option<CustomerInfo>,
}

#[instrument(
  name = "handler::checkout",
  skip(app_state, req_payload),
  fields(lines = req_payload.cart_items.as_ref().map_or(0, Vec::len))
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let CheckoutRequestPayload {
    cart_items,
    customer_info,
  } = req_payload.into_inner();

  let ctx_data = ContextData::new(CheckoutCtxData::new(app_state.get_ref().clone(), cart_items, customer_info));
  run_to_completion(&app_state, ctx_data.clone()).await?;

  let receipt = ctx_data
    .read()
    .receipt
    .clone()
    .ok_or_else(|| AppError::Internal("Checkout completed, but no receipt was issued.".to_string()))?;

  info!(order_id = %receipt.order_id, total = receipt.total, "Checkout completed.");
  Ok(HttpResponse::Ok().json(receipt))
}
