// storefront/src/pipelines/cart_pipeline.rs

use cartflow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{positive_quantity, AddToCartCtxData, UpdateCartQuantityCtxData};

pub fn register_add_to_cart_pipeline(registry: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("fetch_product_for_cart", false, None),
    ("add_or_update_cart_item", false, None),
  ]);

  p.on_root("validate_cart_input", validate_cart_input);
  p.on_root("fetch_product_for_cart", fetch_product_for_cart);
  p.on_root("add_or_update_cart_item", add_or_update_cart_item);

  registry.register_pipeline(p);
  info!("Add to Cart pipeline registered.");
}

pub fn register_update_cart_quantity_pipeline(registry: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<UpdateCartQuantityCtxData, AppError>::new(&[
    ("validate_quantity_input", false, None),
    ("apply_quantity_to_cart", false, None),
  ]);

  p.on_root("validate_quantity_input", validate_quantity_input);
  p.on_root("apply_quantity_to_cart", apply_quantity_to_cart);

  registry.register_pipeline(p);
  info!("Update Cart Quantity pipeline registered.");
}

#[instrument(name = "cart_step::validate_input", skip_all)]
async fn validate_cart_input(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (product_id, requested) = ctx_data.with(|c| (c.product_id.clone(), c.requested_quantity));

  let product_id = product_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty());
  let (Some(product_id), Some(requested)) = (product_id, requested) else {
    warn!("Add to Cart: product id or quantity missing.");
    return Err(AppError::Validation("Need product and quantity".to_string()));
  };
  let quantity = positive_quantity(requested)?;

  let mut guard = ctx_data.write();
  guard.product_id = Some(product_id);
  guard.quantity = quantity;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart_step::fetch_product", skip_all)]
async fn fetch_product_for_cart(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (product_id, store) = ctx_data.with(|c| (c.product_id.clone().unwrap_or_default(), c.app_state.store.clone()));

  let Some(product) = store.find_product(&product_id).await? else {
    warn!(%product_id, "Add to Cart: product not found.");
    return Err(AppError::NotFound("Product not found".to_string()));
  };

  ctx_data.write().product = Some(product);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart_step::upsert_line", skip_all)]
async fn add_or_update_cart_item(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (product_id, quantity, store) =
    ctx_data.with(|c| (c.product_id.clone().unwrap_or_default(), c.quantity, c.app_state.store.clone()));

  let outcome = store.add_to_cart(&product_id, quantity).await?;
  info!(
    cart_item_id = %outcome.item.id,
    %product_id,
    new_quantity = outcome.item.quantity,
    created = outcome.created,
    "Add to Cart: line stored."
  );

  ctx_data.write().outcome = Some(outcome);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart_step::validate_quantity", skip_all)]
async fn validate_quantity_input(
  ctx_data: ContextData<UpdateCartQuantityCtxData>,
) -> Result<PipelineControl, AppError> {
  let Some(requested) = ctx_data.with(|c| c.requested_quantity) else {
    return Err(AppError::Validation("Need quantity".to_string()));
  };

  // Anything below one removes the line.
  let quantity = if requested < 1 { 0 } else { positive_quantity(requested)? };
  ctx_data.write().quantity = quantity;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart_step::apply_quantity", skip_all)]
async fn apply_quantity_to_cart(
  ctx_data: ContextData<UpdateCartQuantityCtxData>,
) -> Result<PipelineControl, AppError> {
  let (cart_item_id, quantity, store) = ctx_data.with(|c| (c.cart_item_id, c.quantity, c.app_state.store.clone()));

  let Some(item) = store.set_cart_quantity(cart_item_id, quantity).await? else {
    warn!(%cart_item_id, "Update Cart Quantity: line not found.");
    return Err(AppError::NotFound(format!("Cart item {} not found", cart_item_id)));
  };
  info!(%cart_item_id, quantity, removed = quantity == 0, "Update Cart Quantity: applied.");

  ctx_data.write().updated_item = Some(item);
  Ok(PipelineControl::Continue)
}
