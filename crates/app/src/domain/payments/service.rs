//! Payments service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        orders::records::OrderUuid,
        payments::{
            data::NewPayment,
            errors::PaymentsServiceError,
            records::{PaymentMethod, PaymentRecord, PaymentUuid},
            repository::PgPaymentsRepository,
        },
        users::records::UserUuid,
    },
};

/// Provider name recorded on placeholder payments.
pub const STUB_PROVIDER: &str = "stub";

/// Records payment attempts without contacting a payment processor.
#[derive(Debug, Clone)]
pub struct PgPaymentsService {
    db: Db,
    repository: PgPaymentsRepository,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPaymentsRepository::new(),
        }
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    async fn create_payment_record(
        &self,
        user: UserUuid,
        order: OrderUuid,
        method: PaymentMethod,
        amount: u64,
    ) -> Result<PaymentRecord, PaymentsServiceError> {
        let payment = NewPayment {
            uuid: PaymentUuid::new(),
            order_uuid: order,
            provider: STUB_PROVIDER,
            method,
            amount: i64::try_from(amount)?,
            external_id: Uuid::new_v4().to_string(),
        };

        let mut tx = self.db.begin_user_transaction(user).await?;

        let created = self.repository.create_payment(&mut tx, &payment).await?;

        tx.commit().await?;

        info!(
            order = %order,
            payment = %created.uuid,
            method = %method,
            amount,
            "payment record created"
        );

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Open an `initiated` payment for a committed order.
    ///
    /// An order holds at most one payment.
    async fn create_payment_record(
        &self,
        user: UserUuid,
        order: OrderUuid,
        method: PaymentMethod,
        amount: u64,
    ) -> Result<PaymentRecord, PaymentsServiceError>;
}
