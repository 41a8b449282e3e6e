//! Users

pub mod data;
pub mod errors;
pub mod records;
mod repository;
mod service;

pub use errors::UsersServiceError;
pub use service::*;
