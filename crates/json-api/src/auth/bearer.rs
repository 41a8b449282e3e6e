//! Bearer credential extraction.

use salvo::{Request, http::header::AUTHORIZATION};
use tracing::error;

use pawcart_app::{
    auth::{AuthService, AuthServiceError},
    domain::users::records::UserUuid,
};

/// Why a request could not be tied to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BearerError {
    /// No `Authorization: Bearer …` header.
    Missing,

    /// Unknown, expired or revoked token.
    Invalid,

    /// Session storage failed; already logged.
    Internal,
}

/// Resolve the caller from the request's bearer token.
pub(crate) async fn authenticate(
    req: &Request,
    auth: &dyn AuthService,
) -> Result<UserUuid, BearerError> {
    let token = extract_bearer_token(req).ok_or(BearerError::Missing)?;

    match auth.authenticate_bearer(token).await {
        Ok(user) => Ok(user),
        Err(AuthServiceError::NotFound | AuthServiceError::UserNotFound) => {
            Err(BearerError::Invalid)
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate session token: {source}");

            Err(BearerError::Internal)
        }
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
