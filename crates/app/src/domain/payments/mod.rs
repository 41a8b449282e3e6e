//! Payments

pub(crate) mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
mod service;

pub use errors::PaymentsServiceError;
pub use service::*;
