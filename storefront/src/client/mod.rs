// storefront/src/client/mod.rs

//! A Rust rendition of the storefront UI: a typed API client and a session
//! that tracks which view is shown and what the shopper has entered.

pub mod api;
pub mod session;

pub use api::{ClientError, ClientResult, HttpShopApi, ShopApi};
pub use session::{ActionOutcome, SessionState, StorefrontSession, View};
