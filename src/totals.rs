//! Checkout Totals

use jiff::Timestamp;
use rusty_money::{Money, iso};
use thiserror::Error;

use crate::{
    coupons::{Coupon, Ineligibility},
    discounts::{DiscountError, discount_for},
    lines::Line,
    pricing::{PricingError, subtotal},
};

/// Errors raised while evaluating checkout totals.
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    /// The cart lines could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The coupon discount could not be calculated.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// The coupon cannot be applied to this cart.
    #[error(transparent)]
    Ineligible(#[from] Ineligibility),
}

/// Subtotal, discount, shipping and grand total of a cart.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Totals<'a> {
    /// Sum of the line totals.
    pub subtotal: Money<'a, iso::Currency>,

    /// Coupon discount, never more than the subtotal.
    pub discount: Money<'a, iso::Currency>,

    /// Shipping cost.
    pub shipping: Money<'a, iso::Currency>,

    /// `subtotal - discount + shipping`.
    pub total: Money<'a, iso::Currency>,
}

impl<'a> Totals<'a> {
    /// All-zero totals in the given currency.
    pub fn zero(currency: &'a iso::Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            subtotal: zero,
            discount: zero,
            shipping: zero,
            total: zero,
        }
    }

    /// Returns these totals with `shipping` added to the grand total.
    ///
    /// # Errors
    ///
    /// - [`PricingError::NegativePrice`]: shipping is below zero.
    /// - [`PricingError::Money`]: shipping is in a different currency.
    pub fn with_shipping(self, shipping: Money<'a, iso::Currency>) -> Result<Self, PricingError> {
        if shipping.to_minor_units() < 0 {
            return Err(PricingError::NegativePrice);
        }

        let total = self.subtotal.sub(self.discount)?.add(shipping)?;

        Ok(Self {
            shipping,
            total,
            ..self
        })
    }
}

/// Evaluates the totals of `lines` with an optional coupon at `now`.
///
/// An empty cart has all-zero totals and never applies a coupon. Shipping is zero; see
/// [`Totals::with_shipping`]. The function is pure: the same inputs always produce the same
/// totals.
///
/// # Errors
///
/// - [`EvaluationError::Pricing`]: a line is invalid or priced in another currency.
/// - [`EvaluationError::Ineligible`]: the coupon cannot be applied to the subtotal at `now`.
/// - [`EvaluationError::Discount`]: the discount could not be calculated.
pub fn evaluate<'a>(
    lines: &[Line<'a>],
    coupon: Option<&Coupon<'a>>,
    currency: &'a iso::Currency,
    now: Timestamp,
) -> Result<Totals<'a>, EvaluationError> {
    if lines.is_empty() {
        return Ok(Totals::zero(currency));
    }

    let subtotal = subtotal(lines, currency)?;

    let discount = match coupon {
        Some(coupon) => {
            coupon.check_eligibility(&subtotal, now)?;

            discount_for(coupon.kind(), &subtotal)?
        }
        None => Money::from_minor(0, currency),
    };

    Ok(Totals {
        subtotal,
        discount,
        shipping: Money::from_minor(0, currency),
        total: subtotal.sub(discount).map_err(PricingError::from)?,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::coupons::CouponKind;

    use super::*;

    fn brl(minor: i64) -> Money<'static, iso::Currency> {
        Money::from_minor(minor, iso::BRL)
    }

    #[test]
    fn evaluate_without_coupon_has_no_discount() -> TestResult {
        let lines = [Line::new(brl(45_00), 2)];

        let totals = evaluate(&lines, None, iso::BRL, Timestamp::now())?;

        assert_eq!(totals.subtotal, brl(90_00));
        assert_eq!(totals.discount, brl(0));
        assert_eq!(totals.total, brl(90_00));

        Ok(())
    }

    #[test]
    fn empty_cart_ignores_coupon() -> TestResult {
        let coupon = Coupon::new("SAVE10", CouponKind::Percent(Decimal::TEN))?.with_active(false);

        let totals = evaluate(&[], Some(&coupon), iso::BRL, Timestamp::now())?;

        assert_eq!(totals, Totals::zero(iso::BRL));

        Ok(())
    }

    #[test]
    fn ineligible_coupon_is_reported() -> TestResult {
        let coupon = Coupon::new("SAVE10", CouponKind::Percent(Decimal::TEN))?
            .with_minimum_amount(brl(100_00));
        let lines = [Line::new(brl(50_00), 1)];

        let result = evaluate(&lines, Some(&coupon), iso::BRL, Timestamp::now());

        assert_eq!(
            result,
            Err(EvaluationError::Ineligible(Ineligibility::BelowMinimum {
                minimum: 100_00
            }))
        );

        Ok(())
    }

    #[test]
    fn with_shipping_adds_to_total() -> TestResult {
        let lines = [Line::new(brl(100_00), 1)];
        let coupon = Coupon::new("OFF15", CouponKind::Fixed(brl(15_00)))?;

        let totals = evaluate(&lines, Some(&coupon), iso::BRL, Timestamp::now())?
            .with_shipping(brl(20_00))?;

        assert_eq!(totals.shipping, brl(20_00));
        assert_eq!(totals.total, brl(105_00));

        Ok(())
    }
}
