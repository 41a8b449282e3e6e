//! Checkout Records

use std::num::TryFromIntError;

use pawcart::Totals;

use crate::{
    domain::{orders::records::OrderRecord, payments::records::PaymentRecord},
    money::to_amount,
};

/// Cart totals in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub subtotal: u64,
    pub discount: u64,
    pub shipping: u64,
    pub total: u64,
}

impl TryFrom<&Totals<'_>> for CheckoutTotals {
    type Error = TryFromIntError;

    fn try_from(totals: &Totals<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            subtotal: to_amount(&totals.subtotal)?,
            discount: to_amount(&totals.discount)?,
            shipping: to_amount(&totals.shipping)?,
            total: to_amount(&totals.total)?,
        })
    }
}

/// A committed order together with its opened payment.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: OrderRecord,
    pub payment: PaymentRecord,
}
