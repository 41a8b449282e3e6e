//! Pawcart storefront domain services and Postgres persistence.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod money;
mod uuids;

pub use money::CURRENCY;
