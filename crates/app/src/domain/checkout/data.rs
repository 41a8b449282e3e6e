//! Checkout Data

use crate::domain::{addresses::records::AddressUuid, payments::records::PaymentMethod};

/// Checkout configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Flat shipping cost added to every committed order, in minor units.
    pub shipping_cost: u64,
}

/// Commit Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOrder {
    pub address_uuid: AddressUuid,
    pub payment_method: PaymentMethod,
    /// Blank codes are treated as no coupon.
    pub coupon_code: Option<String>,
}
