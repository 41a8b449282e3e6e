//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderItemRecord, OrderRecord, OrderStatus, OrderUuid},
        },
        payments::records::PaymentMethod,
    },
    money::{try_get_amount, try_get_count},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");

/// Order queries. Rows are scoped to the transaction's acting user by row-level security.
#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.cart_uuid.into_uuid())
            .bind(order.address_uuid.into_uuid())
            .bind(order.coupon_uuid.map(|uuid| uuid.into_uuid()))
            .bind(order.payment_method.as_str())
            .bind(order.subtotal)
            .bind(order.discount)
            .bind(order.shipping_cost)
            .bind(order.total)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: &NewOrderItem,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.variant_uuid.into_uuid())
            .bind(&item.product_name)
            .bind(&item.variant_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_price)
            .fetch_one(&mut **tx)
            .await
    }

    /// The caller's orders, newest first, without items.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Items of every given order in one round trip.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, OrderItemRecord>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let payment_method: String = row.try_get("payment_method")?;

        let status = OrderStatus::from_db(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown order status {status}").into(),
        })?;

        let payment_method = payment_method
            .parse::<PaymentMethod>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "payment_method".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            number: row.try_get("number")?,
            user_uuid: row.try_get::<Uuid, _>("user_uuid")?.into(),
            cart_uuid: row.try_get::<Uuid, _>("cart_uuid")?.into(),
            address_uuid: row.try_get::<Uuid, _>("address_uuid")?.into(),
            coupon_uuid: row.try_get::<Option<Uuid>, _>("coupon_uuid")?.map(Into::into),
            status,
            payment_method,
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            total: try_get_amount(row, "total")?,
            items: Vec::new(),
            payment: None,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            order_uuid: row.try_get::<Uuid, _>("order_uuid")?.into(),
            variant_uuid: row.try_get::<Option<Uuid>, _>("variant_uuid")?.map(Into::into),
            product_name: row.try_get("product_name")?,
            variant_name: row.try_get("variant_name")?,
            quantity: try_get_count(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            total_price: try_get_amount(row, "total_price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
