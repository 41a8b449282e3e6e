//! Order Data

use crate::domain::{
    addresses::records::AddressUuid,
    carts::records::CartUuid,
    catalog::records::VariantUuid,
    coupons::records::CouponUuid,
    orders::records::{OrderItemUuid, OrderUuid},
    payments::records::PaymentMethod,
};

/// New Order Data, amounts in minor units as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewOrder {
    pub uuid: OrderUuid,
    pub cart_uuid: CartUuid,
    pub address_uuid: AddressUuid,
    pub coupon_uuid: Option<CouponUuid>,
    pub payment_method: PaymentMethod,
    pub subtotal: i64,
    pub discount: i64,
    pub shipping_cost: i64,
    pub total: i64,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub variant_uuid: VariantUuid,
    pub product_name: String,
    pub variant_name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
}
