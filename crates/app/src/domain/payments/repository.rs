//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        orders::records::OrderUuid,
        payments::{
            data::NewPayment,
            records::{PaymentMethod, PaymentRecord, PaymentStatus},
        },
    },
    money::try_get_amount,
};

const CREATE_PAYMENT_SQL: &str = include_str!("sql/create_payment.sql");
const GET_ORDER_PAYMENT_SQL: &str = include_str!("sql/get_order_payment.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: &NewPayment,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(CREATE_PAYMENT_SQL)
            .bind(payment.uuid.into_uuid())
            .bind(payment.order_uuid.into_uuid())
            .bind(payment.provider)
            .bind(payment.method.as_str())
            .bind(payment.amount)
            .bind(&payment.external_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<PaymentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(GET_ORDER_PAYMENT_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let method: String = row.try_get("method")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            order_uuid: row.try_get::<Uuid, _>("order_uuid")?.into(),
            provider: row.try_get("provider")?,
            method: method.parse::<PaymentMethod>().map_err(|e| sqlx::Error::ColumnDecode {
                index: "method".to_string(),
                source: Box::new(e),
            })?,
            amount: try_get_amount(row, "amount")?,
            status: status.parse::<PaymentStatus>().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            external_id: row.try_get("external_id")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
