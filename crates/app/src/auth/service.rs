//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    auth::{
        AuthServiceError, format_session_token, generate_session_secret, hash_session_secret,
        parse_session_token,
        records::{IssuedSession, SessionUuid},
        repository::PgAuthRepository,
    },
    database::Db,
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }

    /// Issue a new bearer session for `user`.
    ///
    /// The raw token is only returned here; storage keeps its SHA-256 hash.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::UserNotFound`] for unknown users, or a storage error.
    pub async fn issue_session(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSession, AuthServiceError> {
        let secret = generate_session_secret();
        let token = format_session_token(&secret);
        let token_hash = hash_session_secret(&secret);

        let mut tx = self.db.begin().await?;

        let session = self
            .repository
            .create_session(&mut tx, SessionUuid::new(), user, &token_hash, expires_at)
            .await?;

        tx.commit().await?;

        info!(session = %session.uuid, user = %user, "session issued");

        Ok(IssuedSession { token, session })
    }

    /// Revoke a session. Returns `true` if it was still active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session(&self, session: SessionUuid) -> Result<bool, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let revoked = self.repository.revoke_session(&mut tx, session).await?;

        tx.commit().await?;

        Ok(revoked.is_some())
    }

    async fn touch_session(&self, session: SessionUuid) -> Result<(), AuthServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.touch_session(&mut tx, session).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let secret = parse_session_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let mut tx = self.db.begin().await?;

        let session = self
            .repository
            .find_active_session_by_hash(&mut tx, &hash_session_secret(&secret))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        tx.commit().await?;

        // Authentication does not depend on recording the last use.
        if let Err(error) = self.touch_session(session.uuid).await {
            warn!(session = %session.uuid, error = %error, "failed to record session use");
        }

        Ok(session.user_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    ///
    /// Malformed, unknown, expired and revoked tokens all fail with
    /// [`AuthServiceError::NotFound`].
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_its_user() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_session(ctx.user_uuid, None).await?;

        assert!(issued.token.starts_with("pc_"), "unexpected token format");
        assert_eq!(ctx.auth.authenticate_bearer(&issued.token).await?, ctx.user_uuid);

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_session(ctx.user_uuid, None).await?;

        assert!(ctx.auth.revoke_session(issued.session.uuid).await?);
        assert!(!ctx.auth.revoke_session(issued.session.uuid).await?);

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let expired = Timestamp::now().checked_sub(1.minute())?;

        let issued = ctx.auth.issue_session(ctx.user_uuid, Some(expired)).await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_and_unknown_tokens_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let unknown = format_session_token(&generate_session_secret());

        for token in ["", "Bearer", "pc_not-hex", unknown.as_str()] {
            let result = ctx.auth.authenticate_bearer(token).await;

            assert!(
                matches!(result, Err(AuthServiceError::NotFound)),
                "expected NotFound for {token:?}, got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn issuing_for_unknown_user_fails() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.issue_session(UserUuid::new(), None).await;

        assert!(
            matches!(result, Err(AuthServiceError::UserNotFound)),
            "expected UserNotFound, got {result:?}"
        );
    }
}
