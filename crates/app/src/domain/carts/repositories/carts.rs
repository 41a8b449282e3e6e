//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::carts::records::{CartRecord, CartStatus, CartUuid};

const ENSURE_ACTIVE_CART_SQL: &str = include_str!("../sql/ensure_active_cart.sql");
const FIND_ACTIVE_CART_SQL: &str = include_str!("../sql/find_active_cart.sql");
const GET_ACTIVE_CART_SQL: &str = include_str!("../sql/get_active_cart.sql");
const LOCK_ACTIVE_CART_SQL: &str = include_str!("../sql/lock_active_cart.sql");
const MARK_CART_CONVERTED_SQL: &str = include_str!("../sql/mark_cart_converted.sql");

/// Cart queries. Rows are scoped to the transaction's acting user by row-level security.
#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Return the caller's active cart, creating it when there is none.
    ///
    /// Two concurrent calls resolve to the same cart through the partial unique index on
    /// active carts.
    pub(crate) async fn ensure_active_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<CartRecord, sqlx::Error> {
        query(ENSURE_ACTIVE_CART_SQL)
            .bind(CartUuid::new().into_uuid())
            .execute(&mut **tx)
            .await?;

        query_as::<Postgres, CartRecord>(FIND_ACTIVE_CART_SQL)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_active_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(FIND_ACTIVE_CART_SQL)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_active_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_ACTIVE_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::get_active_cart`], holding a row lock until the transaction ends.
    pub(crate) async fn lock_active_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(LOCK_ACTIVE_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn mark_converted(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_CART_CONVERTED_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = match status.as_str() {
            "active" => CartStatus::Active,
            "converted" => CartStatus::Converted,
            "abandoned" => CartStatus::Abandoned,
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "status".to_string(),
                    source: format!("unknown cart status {other}").into(),
                });
            }
        };

        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            user_uuid: row.try_get::<Uuid, _>("user_uuid")?.into(),
            status,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
