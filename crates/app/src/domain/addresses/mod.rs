//! Addresses

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
mod service;

pub use errors::AddressesServiceError;
pub use service::*;
