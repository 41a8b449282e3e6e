//! Authentication

mod bearer;
pub(crate) mod middleware;

pub(crate) use bearer::{BearerError, authenticate};
