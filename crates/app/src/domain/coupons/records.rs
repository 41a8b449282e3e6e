//! Coupon Records

use std::num::TryFromIntError;

use jiff::Timestamp;
use pawcart::{Coupon, CouponError, CouponKind};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{money::to_money, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// The reduction a coupon grants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponDiscount {
    /// Percentage off the subtotal, `0..=100`.
    Percent(Decimal),

    /// Fixed amount off the subtotal, in minor units.
    Fixed(u64),
}

impl CouponDiscount {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Percent(_) => "PERCENT",
            Self::Fixed(_) => "FIXED",
        }
    }
}

/// Coupon Record
#[derive(Debug, Clone)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount: CouponDiscount,
    pub minimum_amount: Option<u64>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Error)]
pub enum CouponConversionError {
    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error("coupon amount out of range")]
    Amount(#[from] TryFromIntError),
}

impl CouponRecord {
    /// Build the pricing coupon used to evaluate cart totals.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored values cannot form a valid coupon.
    pub fn to_coupon(&self) -> Result<Coupon<'static>, CouponConversionError> {
        let kind = match self.discount {
            CouponDiscount::Percent(percent) => CouponKind::Percent(percent),
            CouponDiscount::Fixed(amount) => CouponKind::Fixed(to_money(amount)?),
        };

        let mut coupon = Coupon::new(self.code.clone(), kind)?
            .with_window(self.starts_at, self.ends_at)
            .with_usage(self.usage_limit, self.usage_count)
            .with_active(self.active);

        if let Some(minimum) = self.minimum_amount {
            coupon = coupon.with_minimum_amount(to_money(minimum)?);
        }

        Ok(coupon)
    }
}
