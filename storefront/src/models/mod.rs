// storefront/src/models/mod.rs

//! Catalog, cart and receipt data shapes, as stored and as sent on the wire.

pub mod cart_item;
pub mod order;
pub mod product;

pub use cart_item::{CartItem, CartLine, CartSummary};
pub use order::{CheckoutLine, CustomerInfo, Receipt, ReceiptLine};
pub use product::{product_id_from_json, Product};
