// storefront/src/pipelines/mod.rs

//! Defines and registers the cartflow pipelines behind the cart and checkout
//! endpoints.

use crate::errors::AppError;
use cartflow::FlowRegistry;

pub mod contexts;

pub mod cart_pipeline;
pub mod checkout_pipeline;

/// Registers every pipeline with `registry`. Called once while building
/// `AppState`.
pub fn register_all_pipelines(registry: &FlowRegistry<AppError>) {
  tracing::info!("Registering cartflow pipelines...");

  cart_pipeline::register_add_to_cart_pipeline(registry);
  cart_pipeline::register_update_cart_quantity_pipeline(registry);
  checkout_pipeline::register_checkout_pipeline(registry);

  tracing::info!("All application pipelines registered.");
}
