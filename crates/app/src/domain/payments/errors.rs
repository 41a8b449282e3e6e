//! Payments service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

const INSUFFICIENT_PRIVILEGE: &str = "42501";

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("order already has a payment")]
    AlreadyExists,

    #[error("order not found")]
    OrderNotFound,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("invalid payment amount")]
    InvalidAmount(#[from] TryFromIntError),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::OrderNotFound;
        }

        // Row-level security rejects payments for orders the caller cannot see.
        if error
            .as_database_error()
            .and_then(DatabaseError::code)
            .is_some_and(|code| code == INSUFFICIENT_PRIVILEGE)
        {
            return Self::OrderNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::OrderNotFound,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::InvalidData,
            Some(_) | None => Self::Sql(error),
        }
    }
}
