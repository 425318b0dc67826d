// storefront/src/services/catalog.rs

//! Startup catalog loading: one fetch from the configured source, with a
//! built-in fallback list when anything goes wrong.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::errors::Result as AppResult;
use crate::models::Product;
use crate::store::ShopStore;

/// Where the seeded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
  Remote,
  Fallback,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteId {
  Number(i64),
  Text(String),
}

impl fmt::Display for RemoteId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RemoteId::Number(n) => write!(f, "{}", n),
      RemoteId::Text(s) => f.write_str(s),
    }
  }
}

/// A product as published by the external catalog.
#[derive(Debug, Deserialize)]
pub struct RemoteProduct {
  id: RemoteId,
  title: String,
  price: f64,
  #[serde(default)]
  image: String,
  #[serde(default)]
  description: String,
}

fn fallback_product(id: u32, name: &str, price: f64, description: &str) -> Product {
  Product {
    id: id.to_string(),
    name: name.to_string(),
    price,
    image: format!("https://picsum.photos/200/300?random={}", id),
    description: description.to_string(),
  }
}

/// The fixed catalog used when the external source is unavailable.
pub fn fallback_catalog() -> Vec<Product> {
  vec![
    fallback_product(1, "Headphones", 99.99, "Good headphones"),
    fallback_product(2, "Smart Watch", 199.99, "Nice watch"),
    fallback_product(3, "Backpack", 49.99, "Big backpack"),
    fallback_product(4, "USB Hub", 29.99, "Many ports"),
    fallback_product(5, "Keyboard", 79.99, "Mechanical keyboard"),
    fallback_product(6, "Mouse", 39.99, "Wireless mouse"),
    fallback_product(7, "Phone Case", 19.99, "Protective case"),
    fallback_product(8, "Charger", 59.99, "Portable charger"),
  ]
}

/// Maps remote entries onto `Product`, keeping at most `limit`.
///
/// Entries with a negative or non-finite price, and repeated ids, are dropped.
pub fn normalize(remote: Vec<RemoteProduct>, limit: usize) -> Vec<Product> {
  let mut seen = HashSet::new();
  remote
    .into_iter()
    .take(limit)
    .filter_map(|entry| {
      let id = entry.id.to_string();
      if !entry.price.is_finite() || entry.price < 0.0 {
        warn!(product_id = %id, price = entry.price, "Dropping remote product with invalid price.");
        return None;
      }
      if !seen.insert(id.clone()) {
        warn!(product_id = %id, "Dropping remote product with repeated id.");
        return None;
      }
      Some(Product {
        id,
        name: entry.title,
        price: entry.price,
        image: entry.image,
        description: entry.description,
      })
    })
    .collect()
}

#[instrument(name = "catalog::fetch_remote", skip(config), fields(url = %config.catalog_url))]
pub async fn fetch_remote_catalog(config: &AppConfig) -> anyhow::Result<Vec<Product>> {
  let client = reqwest::Client::builder()
    .timeout(config.catalog_fetch_timeout)
    .build()
    .context("building catalog HTTP client")?;

  let remote: Vec<RemoteProduct> = client
    .get(&config.catalog_url)
    .send()
    .await
    .context("catalog request failed")?
    .error_for_status()
    .context("catalog source returned an error status")?
    .json()
    .await
    .context("catalog response is not a product list")?;

  let products = normalize(remote, config.catalog_limit);
  if products.is_empty() {
    bail!("catalog source returned no usable products");
  }
  Ok(products)
}

/// Resolves the startup catalog. Never fails: any fetch problem yields the
/// fallback list.
pub async fn load_catalog(config: &AppConfig) -> (Vec<Product>, CatalogSource) {
  if config.catalog_offline {
    info!("Catalog fetch disabled; using the built-in catalog.");
    return (fallback_catalog(), CatalogSource::Fallback);
  }

  match fetch_remote_catalog(config).await {
    Ok(products) => {
      info!(count = products.len(), "Fetched remote catalog.");
      (products, CatalogSource::Remote)
    }
    Err(e) => {
      warn!(error = %format!("{:#}", e), "Catalog fetch failed; using the built-in catalog.");
      (fallback_catalog(), CatalogSource::Fallback)
    }
  }
}

/// Loads the catalog and seeds it into `store`. Runs once, before serving.
pub async fn seed_catalog(store: &dyn ShopStore, config: &AppConfig) -> AppResult<CatalogSource> {
  let (products, source) = load_catalog(config).await;
  let seeded = store.seed_products(products).await?;
  info!(count = seeded, ?source, "Product catalog seeded.");
  Ok(source)
}
