// storefront/src/pipelines/checkout_pipeline.rs

use cartflow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CustomerInfo, Receipt, ReceiptLine};
use crate::pipelines::contexts::{positive_quantity, CheckoutCtxData};

pub fn register_checkout_pipeline(registry: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("validate_checkout_input", false, None),
    ("price_checkout_lines", false, None),
    ("issue_receipt", false, None),
    ("clear_cart_after_checkout", false, None),
  ]);

  p.on_root("validate_checkout_input", validate_checkout_input);
  p.on_root("price_checkout_lines", price_checkout_lines);
  p.on_root("issue_receipt", issue_receipt);
  p.on_root("clear_cart_after_checkout", clear_cart_after_checkout);

  registry.register_pipeline(p);
  info!("Checkout pipeline registered.");
}

#[instrument(name = "checkout_step::validate_input", skip_all)]
async fn validate_checkout_input(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (lines, customer) = ctx_data.with(|c| (c.submitted_lines.clone(), c.submitted_customer.clone()));

  let lines = lines.unwrap_or_default();
  if lines.is_empty() {
    warn!("Checkout: empty cart submitted.");
    return Err(AppError::Validation("Cart empty".to_string()));
  }

  let customer = customer.filter(CustomerInfo::is_complete).ok_or_else(|| {
    warn!("Checkout: customer name or email missing.");
    AppError::Validation("Need name and email".to_string())
  })?;

  let mut validated = Vec::with_capacity(lines.len());
  for (idx, line) in lines.iter().enumerate() {
    let product_id = line
      .product_id
      .as_deref()
      .map(str::trim)
      .filter(|id| !id.is_empty())
      .ok_or_else(|| AppError::Validation(format!("Cart line {} has no product", idx + 1)))?;
    let quantity = line
      .quantity
      .ok_or_else(|| AppError::Validation(format!("Cart line {} has no quantity", idx + 1)))
      .and_then(positive_quantity)?;
    validated.push((product_id.to_string(), quantity));
  }

  let mut guard = ctx_data.write();
  guard.validated_lines = validated;
  guard.customer = Some(CustomerInfo {
    name: customer.name.trim().to_string(),
    email: customer.email.trim().to_string(),
  });
  Ok(PipelineControl::Continue)
}

/// Prices every line from the catalog; submitted prices are ignored.
#[instrument(name = "checkout_step::price_lines", skip_all)]
async fn price_checkout_lines(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (lines, submitted, store) = ctx_data.with(|c| {
    (
      c.validated_lines.clone(),
      c.submitted_lines.clone().unwrap_or_default(),
      c.app_state.store.clone(),
    )
  });

  let mut priced = Vec::with_capacity(lines.len());
  for (idx, (product_id, quantity)) in lines.into_iter().enumerate() {
    let Some(product) = store.find_product(&product_id).await? else {
      warn!(%product_id, "Checkout: line references an unknown product.");
      return Err(AppError::NotFound(format!("Product {} not found", product_id)));
    };

    if let Some(client_price) = submitted.get(idx).and_then(|line| line.price) {
      if client_price != product.price {
        warn!(%product_id, client_price, catalog_price = product.price, "Checkout: submitted price ignored.");
      }
    }

    priced.push(ReceiptLine {
      item_total: product.price * f64::from(quantity),
      product_id,
      name: product.name,
      price: product.price,
      quantity,
    });
  }

  let total = priced.iter().map(|line| line.item_total).sum();
  let mut guard = ctx_data.write();
  guard.priced_lines = priced;
  guard.total = total;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout_step::issue_receipt", skip_all)]
async fn issue_receipt(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let mut guard = ctx_data.write();
  let customer = guard
    .customer
    .clone()
    .ok_or_else(|| AppError::Internal("Checkout reached receipt without a customer.".to_string()))?;

  let receipt = Receipt {
    order_id: Uuid::new_v4(),
    customer,
    items: guard.priced_lines.clone(),
    total: guard.total,
    timestamp: Utc::now(),
  };
  info!(order_id = %receipt.order_id, total = receipt.total, lines = receipt.items.len(), "Checkout: receipt issued.");
  guard.receipt = Some(receipt);
  Ok(PipelineControl::Continue)
}

/// Empties the whole cart, not just the submitted lines.
#[instrument(name = "checkout_step::clear_cart", skip_all)]
async fn clear_cart_after_checkout(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let store = ctx_data.with(|c| c.app_state.store.clone());
  let cleared = store.clear_cart().await?;
  info!(cleared_lines = cleared, "Checkout: cart cleared.");
  ctx_data.write().cleared_lines = cleared;
  Ok(PipelineControl::Continue)
}
