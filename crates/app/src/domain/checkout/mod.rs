//! Checkout
//!
//! Prices carts with an optional coupon and turns them into orders.

pub mod data;
pub mod errors;
pub mod records;
mod service;

pub use errors::{CheckoutServiceError, StockShortfall};
pub use service::*;
