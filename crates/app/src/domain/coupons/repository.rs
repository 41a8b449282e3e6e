//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    domain::coupons::{
        data::NewCoupon,
        records::{CouponDiscount, CouponRecord, CouponUuid},
    },
    money::{try_get_amount, try_get_count, try_get_optional_amount, try_get_optional_count},
};

const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const GET_COUPON_BY_CODE_SQL: &str = include_str!("sql/get_coupon_by_code.sql");
const LOCK_COUPON_BY_CODE_SQL: &str = include_str!("sql/lock_coupon_by_code.sql");
const INCREMENT_USAGE_SQL: &str = include_str!("sql/increment_usage.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: &NewCoupon,
        amount_off: Option<i64>,
        minimum_amount: Option<i64>,
        usage_limit: Option<i32>,
    ) -> Result<CouponRecord, sqlx::Error> {
        let percent_off = match coupon.discount {
            CouponDiscount::Percent(percent) => Some(percent),
            CouponDiscount::Fixed(_) => None,
        };

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(coupon.discount.kind())
            .bind(percent_off)
            .bind(amount_off)
            .bind(minimum_amount)
            .bind(coupon.starts_at.map(SqlxTimestamp::from))
            .bind(coupon.ends_at.map(SqlxTimestamp::from))
            .bind(usage_limit)
            .bind(coupon.active)
            .fetch_one(&mut **tx)
            .await
    }

    /// Case-sensitive exact lookup.
    pub(crate) async fn get_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::get_coupon_by_code`], holding a row lock until the transaction ends so
    /// concurrent redemptions are checked against the latest usage count.
    pub(crate) async fn lock_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LOCK_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn increment_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<(), sqlx::Error> {
        query(INCREMENT_USAGE_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        let discount = match kind.as_str() {
            "PERCENT" => CouponDiscount::Percent(row.try_get::<Decimal, _>("percent_off")?),
            "FIXED" => CouponDiscount::Fixed(try_get_amount(row, "amount_off")?),
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "kind".to_string(),
                    source: format!("unknown coupon kind {other}").into(),
                });
            }
        };

        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            code: row.try_get("code")?,
            discount,
            minimum_amount: try_get_optional_amount(row, "minimum_amount")?,
            starts_at: row
                .try_get::<Option<SqlxTimestamp>, _>("starts_at")?
                .map(SqlxTimestamp::to_jiff),
            ends_at: row
                .try_get::<Option<SqlxTimestamp>, _>("ends_at")?
                .map(SqlxTimestamp::to_jiff),
            usage_limit: try_get_optional_count(row, "usage_limit")?,
            usage_count: try_get_count(row, "usage_count")?,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
