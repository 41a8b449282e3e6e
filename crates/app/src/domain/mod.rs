//! Pawcart Domain Concerns

pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod orders;
pub mod payments;
pub mod users;
