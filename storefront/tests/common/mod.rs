// storefront/tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use once_cell::sync::Lazy;
use storefront::config::AppConfig;
use storefront::models::Product;
use storefront::services::catalog::{fallback_catalog, seed_catalog, CatalogSource};
use storefront::state::AppState;
use storefront::store::{InMemoryStore, ShopStore};

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

/// Config that never reaches out to the network.
pub fn offline_config() -> AppConfig {
  AppConfig {
    catalog_offline: true,
    ..AppConfig::default()
  }
}

/// State over a fresh store seeded with the built-in catalog.
pub async fn seeded_state() -> AppState {
  setup_tracing();
  let config = offline_config();
  let store: Arc<dyn ShopStore> = Arc::new(InMemoryStore::new());
  let source = seed_catalog(store.as_ref(), &config).await.expect("seeding failed");
  assert_eq!(source, CatalogSource::Fallback);
  AppState::new(store, Arc::new(config))
}

pub fn catalog_product(id: &str) -> Product {
  fallback_catalog()
    .into_iter()
    .find(|p| p.id == id)
    .expect("no such fallback product")
}

pub fn approx_eq(a: f64, b: f64) -> bool {
  (a - b).abs() < 1e-9
}
