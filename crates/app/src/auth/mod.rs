//! Authentication

mod errors;
pub mod records;
pub(crate) mod repository;
mod service;
mod token;

pub use errors::AuthServiceError;
pub use service::*;
pub use token::*;
