// storefront/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::store::ShopStore;
use cartflow::FlowRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn ShopStore>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the state and registers every workflow pipeline on it.
  pub fn new(store: Arc<dyn ShopStore>, config: Arc<AppConfig>) -> Self {
    let state = Self {
      store,
      flows: Arc::new(FlowRegistry::new()),
      config,
    };
    crate::pipelines::register_all_pipelines(&state.flows);
    state
  }
}
