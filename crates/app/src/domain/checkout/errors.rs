//! Checkout service errors.

use std::num::TryFromIntError;

use pawcart::{EvaluationError, Ineligibility, PricingError};
use sqlx::Error;
use thiserror::Error;

use crate::domain::{
    catalog::records::VariantUuid, coupons::records::CouponConversionError,
    orders::records::OrderUuid, payments::PaymentsServiceError,
};

/// A cart line that cannot be fulfilled from current stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockShortfall {
    pub variant: VariantUuid,
    pub requested: u32,
    /// Zero when the variant is inactive or no longer exists.
    pub available: u32,
}

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    /// The cart does not exist, belongs to someone else, or is no longer active.
    #[error("cart not found or not active")]
    CartNotFound,

    #[error("coupon not found")]
    CouponNotFound,

    #[error("coupon cannot be applied: {0}")]
    CouponIneligible(Ineligibility),

    #[error("insufficient stock for {} variant(s)", .0.len())]
    InsufficientStock(Vec<StockShortfall>),

    #[error("cart contains an invalid quantity")]
    InvalidQuantity,

    #[error("cart is empty")]
    EmptyCart,

    #[error("address not found")]
    AddressNotFound,

    /// The order was committed but no payment record exists for it.
    #[error("order {number} was committed but its payment record could not be created")]
    PaymentRecordFailed {
        order: OrderUuid,
        number: i64,
        #[source]
        source: PaymentsServiceError,
    },

    #[error("could not price the cart")]
    Pricing(#[source] EvaluationError),

    #[error("stored coupon is invalid")]
    Coupon(#[from] CouponConversionError),

    #[error("amount out of range")]
    InvalidAmount(#[from] TryFromIntError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<EvaluationError> for CheckoutServiceError {
    fn from(error: EvaluationError) -> Self {
        match error {
            EvaluationError::Ineligible(reason) => Self::CouponIneligible(reason),
            EvaluationError::Pricing(PricingError::InvalidQuantity) => Self::InvalidQuantity,
            error => Self::Pricing(error),
        }
    }
}

impl From<PricingError> for CheckoutServiceError {
    fn from(error: PricingError) -> Self {
        EvaluationError::Pricing(error).into()
    }
}
