//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, migrate::MigrateError, query, query_as};

use crate::domain::users::records::UserUuid;

/// SQL used to set the acting user for row-level security.
pub const SET_USER_CONTEXT_SQL: &str = "SELECT set_config('app.current_user_uuid', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction without a user context.
    ///
    /// Only tables without row-level security (catalog, coupons, users) are visible.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction acting on behalf of `user`.
    ///
    /// The setting is transaction-local, so it never leaks to other requests sharing the
    /// pooled connection.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the user context fails.
    pub async fn begin_user_transaction(
        &self,
        user: UserUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_USER_CONTEXT_SQL)
            .bind(user.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Refuse roles that skip row-level security.
///
/// Superusers and `BYPASSRLS` roles ignore even `FORCE ROW LEVEL SECURITY`.
///
/// # Errors
///
/// Returns [`sqlx::Error::Configuration`] when the connected role bypasses row-level
/// security, or an error if the role cannot be inspected.
pub async fn ensure_rls_enforced_role(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (role, superuser, bypass_rls): (String, bool, bool) = query_as(
        "SELECT rolname::TEXT, rolsuper, rolbypassrls FROM pg_roles WHERE rolname = current_user",
    )
    .fetch_one(pool)
    .await?;

    if superuser || bypass_rls {
        return Err(sqlx::Error::Configuration(
            format!("role {role} bypasses row-level security; connect as an application role")
                .into(),
        ));
    }

    Ok(())
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::query_scalar;
    use testresult::TestResult;

    use crate::test::{TestContext, TestDb};

    use super::*;

    #[tokio::test]
    async fn superuser_pool_is_refused() {
        let test_db = TestDb::new().await;

        let result = ensure_rls_enforced_role(test_db.pool()).await;

        assert!(
            matches!(result, Err(sqlx::Error::Configuration(_))),
            "expected a configuration error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn user_transaction_sets_the_current_user() -> TestResult {
        let ctx = TestContext::new().await;

        let mut tx = ctx.app_db.begin_user_transaction(ctx.user_uuid).await?;

        let current: Option<uuid::Uuid> = query_scalar("SELECT app_current_user_uuid()")
            .fetch_one(&mut *tx)
            .await?;

        tx.rollback().await?;

        assert_eq!(current, Some(ctx.user_uuid.into_uuid()));

        let mut tx = ctx.app_db.begin().await?;

        let anonymous: Option<uuid::Uuid> = query_scalar("SELECT app_current_user_uuid()")
            .fetch_one(&mut *tx)
            .await?;

        assert_eq!(anonymous, None);

        Ok(())
    }
}
