//! Payment Data

use crate::domain::{
    orders::records::OrderUuid,
    payments::records::{PaymentMethod, PaymentUuid},
};

/// New Payment Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewPayment {
    pub uuid: PaymentUuid,
    pub order_uuid: OrderUuid,
    pub provider: &'static str,
    pub method: PaymentMethod,
    pub amount: i64,
    pub external_id: String,
}
