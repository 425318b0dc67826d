// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  /// Where the product catalog is fetched from at startup.
  pub catalog_url: String,
  /// Maximum number of remote products kept.
  pub catalog_limit: usize,
  pub catalog_fetch_timeout: Duration,
  /// Skip the outbound fetch and seed the built-in catalog.
  pub catalog_offline: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 5000,
      catalog_url: DEFAULT_CATALOG_URL.to_string(),
      catalog_limit: 10,
      catalog_fetch_timeout: Duration::from_secs(10),
      catalog_offline: false,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable source; unset variables
  /// fall back to the defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let parse_or = |var_name: &str, default: String| -> String { lookup(var_name).unwrap_or(default) };

    let server_host = parse_or("SERVER_HOST", defaults.server_host);
    let server_port = parse_var(&lookup, "SERVER_PORT", defaults.server_port)?;
    let catalog_url = parse_or("CATALOG_URL", defaults.catalog_url);
    let catalog_limit = parse_var(&lookup, "CATALOG_LIMIT", defaults.catalog_limit)?;
    let timeout_secs = parse_var(
      &lookup,
      "CATALOG_FETCH_TIMEOUT_SECS",
      defaults.catalog_fetch_timeout.as_secs(),
    )?;
    let catalog_offline = parse_var(&lookup, "CATALOG_OFFLINE", defaults.catalog_offline)?;

    if catalog_limit == 0 {
      return Err(AppError::Config("CATALOG_LIMIT must be at least 1".to_string()));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      catalog_url,
      catalog_limit,
      catalog_fetch_timeout: Duration::from_secs(timeout_secs),
      catalog_offline,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(var_name) {
    None => Ok(default),
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
  }
}
