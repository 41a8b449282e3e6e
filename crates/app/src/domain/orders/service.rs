//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        payments::repository::PgPaymentsRepository,
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    payments_repository: PgPaymentsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            payments_repository: PgPaymentsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut orders = self.repository.list_orders(&mut tx).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let items = self.repository.get_order_items(&mut tx, &uuids).await?;

        tx.commit().await?;

        let mut items_by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for item in items {
            items_by_order.entry(item.order_uuid).or_default().push(item);
        }

        for order in &mut orders {
            order.items = items_by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut record = self.repository.get_order(&mut tx, order).await?;

        record.items = self.repository.get_order_items(&mut tx, &[order]).await?;

        record.payment = self
            .payments_repository
            .get_order_payment(&mut tx, order)
            .await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The caller's order history, newest first, with items.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// A single order of the caller's, with items and payment.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{orders::records::OrderStatus, payments::PaymentsService},
        test::{TestContext, helpers::commit_single_item_order},
    };

    use super::*;

    #[tokio::test]
    async fn list_orders_is_newest_first_with_items() -> TestResult {
        let ctx = TestContext::new().await;

        let first = commit_single_item_order(&ctx, ctx.user_uuid, 10_00, 1).await?;
        let second = commit_single_item_order(&ctx, ctx.user_uuid, 20_00, 3).await?;

        let orders = ctx.orders.list_orders(ctx.user_uuid).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        assert_eq!(uuids, vec![second.uuid, first.uuid]);
        assert!(second.number > first.number);

        let newest = orders.first().ok_or("order missing")?;
        let item = newest.items.first().ok_or("item missing")?;

        assert_eq!(newest.items.len(), 1);
        assert_eq!(item.quantity, 3);
        assert_eq!(item.total_price, 60_00);

        Ok(())
    }

    #[tokio::test]
    async fn get_order_includes_payment() -> TestResult {
        let ctx = TestContext::new().await;
        let order = commit_single_item_order(&ctx, ctx.user_uuid, 15_00, 2).await?;

        let payment = ctx
            .payments
            .create_payment_record(
                ctx.user_uuid,
                order.uuid,
                order.payment_method,
                order.total,
            )
            .await?;

        let fetched = ctx.orders.get_order(ctx.user_uuid, order.uuid).await?;

        assert_eq!(fetched.status, OrderStatus::Pending);
        assert_eq!(fetched.total, 30_00);
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.payment.map(|p| p.uuid), Some(payment.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn other_users_order_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_user("other@example.com").await;
        let order = commit_single_item_order(&ctx, ctx.user_uuid, 15_00, 1).await?;

        let result = ctx.orders.get_order(other, order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        assert!(ctx.orders.list_orders(other).await?.is_empty());

        Ok(())
    }
}
