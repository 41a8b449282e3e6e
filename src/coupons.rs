//! Coupons

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use thiserror::Error;

/// How a coupon reduces the subtotal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CouponKind<'a> {
    /// Percentage off the subtotal, in `0..=100`.
    Percent(Decimal),

    /// Fixed amount off the subtotal.
    Fixed(Money<'a, iso::Currency>),
}

/// Errors raised when constructing a coupon.
#[derive(Debug, Error, PartialEq)]
pub enum CouponError {
    /// The coupon code is blank.
    #[error("coupon code must not be blank")]
    BlankCode,

    /// Percent value outside `0..=100`.
    #[error("percent off must be between 0 and 100, got {0}")]
    InvalidPercent(Decimal),

    /// Fixed amount below zero.
    #[error("amount off must not be negative")]
    NegativeAmount,
}

/// Reasons a coupon cannot be applied to a cart.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Ineligibility {
    /// The coupon has been switched off.
    #[error("coupon is inactive")]
    Inactive,

    /// The redemption window has not opened yet.
    #[error("coupon is not valid until {starts_at}")]
    NotStarted {
        /// Start of the redemption window.
        starts_at: Timestamp,
    },

    /// The redemption window has closed.
    #[error("coupon expired at {ends_at}")]
    Expired {
        /// End of the redemption window.
        ends_at: Timestamp,
    },

    /// All redemptions have been used.
    #[error("coupon usage limit of {limit} reached")]
    UsageLimitReached {
        /// Maximum number of redemptions.
        limit: u32,
    },

    /// The subtotal is below the coupon minimum.
    #[error("subtotal is below the coupon minimum of {minimum} minor units")]
    BelowMinimum {
        /// Minimum subtotal in minor units.
        minimum: i64,
    },
}

/// A discount code with optional minimum subtotal, validity window and usage limit.
#[derive(Clone, Debug, PartialEq)]
pub struct Coupon<'a> {
    code: String,
    kind: CouponKind<'a>,
    minimum_amount: Option<Money<'a, iso::Currency>>,
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
    usage_limit: Option<u32>,
    usage_count: u32,
    active: bool,
}

impl<'a> Coupon<'a> {
    /// Creates an active, unrestricted coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponError`] when the code is blank, a percent falls outside `0..=100`,
    /// or a fixed amount is negative.
    pub fn new(code: impl Into<String>, kind: CouponKind<'a>) -> Result<Self, CouponError> {
        let code = code.into();

        if code.trim().is_empty() {
            return Err(CouponError::BlankCode);
        }

        match kind {
            CouponKind::Percent(percent)
                if percent.is_sign_negative() || percent > Decimal::ONE_HUNDRED =>
            {
                return Err(CouponError::InvalidPercent(percent));
            }
            CouponKind::Fixed(amount) if amount.to_minor_units() < 0 => {
                return Err(CouponError::NegativeAmount);
            }
            CouponKind::Percent(_) | CouponKind::Fixed(_) => {}
        }

        Ok(Self {
            code,
            kind,
            minimum_amount: None,
            starts_at: None,
            ends_at: None,
            usage_limit: None,
            usage_count: 0,
            active: true,
        })
    }

    /// Sets the minimum subtotal required to redeem.
    #[must_use]
    pub fn with_minimum_amount(mut self, minimum_amount: Money<'a, iso::Currency>) -> Self {
        self.minimum_amount = Some(minimum_amount);
        self
    }

    /// Sets the redemption window. Either bound may be open.
    #[must_use]
    pub fn with_window(mut self, starts_at: Option<Timestamp>, ends_at: Option<Timestamp>) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Sets the usage limit and the number of redemptions so far.
    #[must_use]
    pub fn with_usage(mut self, usage_limit: Option<u32>, usage_count: u32) -> Self {
        self.usage_limit = usage_limit;
        self.usage_count = usage_count;
        self
    }

    /// Sets whether the coupon is switched on.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns the coupon code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the coupon kind
    pub fn kind(&self) -> &CouponKind<'a> {
        &self.kind
    }

    /// Returns the minimum subtotal, if any
    pub fn minimum_amount(&self) -> Option<&Money<'a, iso::Currency>> {
        self.minimum_amount.as_ref()
    }

    /// Returns the redemption count
    pub fn usage_count(&self) -> u32 {
        self.usage_count
    }

    /// Checks whether the coupon may be applied to `subtotal` at `now`.
    ///
    /// Window bounds and the minimum are inclusive. The first failing rule is reported, in the
    /// order: active flag, window, usage limit, minimum.
    ///
    /// # Errors
    ///
    /// Returns the [`Ineligibility`] reason when the coupon cannot be applied.
    pub fn check_eligibility(
        &self,
        subtotal: &Money<'a, iso::Currency>,
        now: Timestamp,
    ) -> Result<(), Ineligibility> {
        if !self.active {
            return Err(Ineligibility::Inactive);
        }

        if let Some(starts_at) = self.starts_at
            && now < starts_at
        {
            return Err(Ineligibility::NotStarted { starts_at });
        }

        if let Some(ends_at) = self.ends_at
            && now > ends_at
        {
            return Err(Ineligibility::Expired { ends_at });
        }

        if let Some(limit) = self.usage_limit
            && self.usage_count >= limit
        {
            return Err(Ineligibility::UsageLimitReached { limit });
        }

        if let Some(minimum) = self.minimum_amount
            && subtotal.to_minor_units() < minimum.to_minor_units()
        {
            return Err(Ineligibility::BelowMinimum {
                minimum: minimum.to_minor_units(),
            });
        }

        Ok(())
    }
}
