// storefront/src/lib.rs

//! A small storefront: a seeded product catalog, one shared cart and a
//! checkout that issues receipts. The HTTP API runs each mutating operation
//! through a cartflow pipeline; `client` drives the same API from Rust.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
