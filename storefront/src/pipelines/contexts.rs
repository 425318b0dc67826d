// storefront/src/pipelines/contexts.rs

//! Data carried through each pipeline run. Handlers receive these wrapped in
//! `cartflow::ContextData`.

use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{CartItem, CheckoutLine, CustomerInfo, Product, Receipt, ReceiptLine};
use crate::state::AppState;
use crate::store::CartUpsert;

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  // Raw request fields; validated by the first step.
  pub product_id: Option<String>,
  pub requested_quantity: Option<i64>,
  pub quantity: u32,
  pub product: Option<Product>,
  pub outcome: Option<CartUpsert>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, product_id: Option<String>, requested_quantity: Option<i64>) -> Self {
    Self {
      app_state,
      product_id,
      requested_quantity,
      quantity: 0,
      product: None,
      outcome: None,
    }
  }
}

#[derive(Clone)]
pub struct UpdateCartQuantityCtxData {
  pub app_state: AppState,
  pub cart_item_id: Uuid,
  pub requested_quantity: Option<i64>,
  /// 0 means remove the line.
  pub quantity: u32,
  pub updated_item: Option<CartItem>,
}

impl UpdateCartQuantityCtxData {
  pub fn new(app_state: AppState, cart_item_id: Uuid, requested_quantity: Option<i64>) -> Self {
    Self {
      app_state,
      cart_item_id,
      requested_quantity,
      quantity: 0,
      updated_item: None,
    }
  }
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub submitted_lines: Option<Vec<CheckoutLine>>,
  pub submitted_customer: Option<CustomerInfo>,
  // (product id, quantity) pairs that passed validation, in submitted order
  pub validated_lines: Vec<(String, u32)>,
  pub customer: Option<CustomerInfo>,
  pub priced_lines: Vec<ReceiptLine>,
  pub total: f64,
  pub receipt: Option<Receipt>,
  pub cleared_lines: usize,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, lines: Option<Vec<CheckoutLine>>, customer: Option<CustomerInfo>) -> Self {
    Self {
      app_state,
      submitted_lines: lines,
      submitted_customer: customer,
      validated_lines: Vec::new(),
      customer: None,
      priced_lines: Vec::new(),
      total: 0.0,
      receipt: None,
      cleared_lines: 0,
    }
  }
}

/// Accepts a strictly positive quantity that fits a cart line.
pub fn positive_quantity(raw: i64) -> Result<u32> {
  if raw < 1 {
    return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
  }
  u32::try_from(raw).map_err(|_| AppError::Validation(format!("Quantity {} is too large.", raw)))
}
