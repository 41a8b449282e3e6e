//! Order Handlers

pub(crate) mod get;
pub(crate) mod index;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawcart_app::domain::{
    orders::records::{OrderItemRecord, OrderRecord},
    payments::records::PaymentRecord,
};

/// Order Response
///
/// Amounts are centavos, frozen when the order was placed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Customer-facing order number
    pub number: i64,

    pub status: String,
    pub payment_method: String,
    pub address_uuid: Uuid,
    pub subtotal: u64,
    pub discount: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub items: Vec<OrderItemResponse>,

    /// Present once a payment has been opened
    pub payment: Option<OrderPaymentResponse>,

    pub created_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into(),
            number: order.number,
            status: order.status.as_str().to_string(),
            payment_method: order.payment_method.to_string(),
            address_uuid: order.address_uuid.into(),
            subtotal: order.subtotal,
            discount: order.discount,
            shipping_cost: order.shipping_cost,
            total: order.total,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            payment: order.payment.map(OrderPaymentResponse::from),
            created_at: order.created_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,

    /// Absent once the variant has been removed from the catalog
    pub variant_uuid: Option<Uuid>,

    pub product_name: String,
    pub variant_name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub total_price: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            variant_uuid: item.variant_uuid.map(Into::into),
            product_name: item.product_name,
            variant_name: item.variant_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
        }
    }
}

/// Order Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderPaymentResponse {
    pub provider: String,
    pub status: String,
    pub amount: u64,
    pub reference: String,
}

impl From<PaymentRecord> for OrderPaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        Self {
            provider: payment.provider,
            status: payment.status.as_str().to_string(),
            amount: payment.amount,
            reference: payment.external_id,
        }
    }
}
