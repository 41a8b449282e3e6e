//! Order Records

use jiff::Timestamp;

use crate::{
    domain::{
        addresses::records::AddressUuid,
        carts::records::CartUuid,
        catalog::records::VariantUuid,
        coupons::records::CouponUuid,
        payments::records::{PaymentMethod, PaymentRecord},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Status
///
/// Orders are created `Pending`; later transitions are driven by payment and fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Fulfilling,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Fulfilling => "FULFILLING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Canceled => "CANCELED",
        }
    }

    pub(crate) fn from_db(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "PAID" => Some(Self::Paid),
            "FULFILLING" => Some(Self::Fulfilling),
            "SHIPPED" => Some(Self::Shipped),
            "DELIVERED" => Some(Self::Delivered),
            "CANCELED" => Some(Self::Canceled),
            _ => None,
        }
    }
}

/// Order Record
///
/// A frozen snapshot of a checked-out cart. Amounts are minor units.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    /// Sequential, customer-facing order number.
    pub number: i64,
    pub user_uuid: UserUuid,
    pub cart_uuid: CartUuid,
    pub address_uuid: AddressUuid,
    pub coupon_uuid: Option<CouponUuid>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub subtotal: u64,
    pub discount: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub items: Vec<OrderItemRecord>,
    pub payment: Option<PaymentRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record
///
/// Product and variant names and prices are copied at commit time.
#[derive(Debug, Clone)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    /// Cleared if the variant is later deleted from the catalog.
    pub variant_uuid: Option<VariantUuid>,
    pub product_name: String,
    pub variant_name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub total_price: u64,
    pub created_at: Timestamp,
}
