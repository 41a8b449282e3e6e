//! Discounts

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use thiserror::Error;

use crate::coupons::CouponKind;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage could not be applied to the subtotal.
    #[error("could not apply percentage to the subtotal")]
    PercentConversion,
}

/// Calculates the discount a coupon grants on `subtotal`.
///
/// Percentages are applied to the exact subtotal and rounded once, half away from zero, to the
/// minor unit. Fixed amounts are capped at the subtotal. The result never exceeds the subtotal.
///
/// # Errors
///
/// - [`DiscountError::PercentConversion`]: the percentage could not be applied.
pub fn discount_for<'a>(
    kind: &CouponKind<'a>,
    subtotal: &Money<'a, iso::Currency>,
) -> Result<Money<'a, iso::Currency>, DiscountError> {
    let subtotal_minor = subtotal.to_minor_units();

    let discount_minor = match kind {
        CouponKind::Percent(percent) => percent_of_minor(*percent, subtotal_minor)?,
        CouponKind::Fixed(amount) => amount.to_minor_units(),
    };

    Ok(Money::from_minor(
        discount_minor.clamp(0, subtotal_minor.max(0)),
        subtotal.currency(),
    ))
}

/// Calculate `minor × percent / 100`, rounded to a whole minor unit.
fn percent_of_minor(percent: Decimal, minor: i64) -> Result<i64, DiscountError> {
    let Some(applied) = Decimal::from(minor)
        .checked_mul(percent)
        .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
    else {
        return Err(DiscountError::PercentConversion);
    };

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_i64().ok_or(DiscountError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn brl(minor: i64) -> Money<'static, iso::Currency> {
        Money::from_minor(minor, iso::BRL)
    }

    #[test]
    fn percent_discount_is_applied_to_subtotal() -> TestResult {
        let discount = discount_for(&CouponKind::Percent(Decimal::TEN), &brl(100_00))?;

        assert_eq!(discount, brl(10_00));

        Ok(())
    }

    #[test]
    fn percent_discount_rounds_half_up() -> TestResult {
        // 15% of 0.10 is 0.015, which rounds to 0.02
        let discount = discount_for(&CouponKind::Percent(Decimal::new(15, 0)), &brl(10))?;

        assert_eq!(discount, brl(2));

        Ok(())
    }

    #[test]
    fn percent_discount_rounds_down_below_half() -> TestResult {
        // 12.5% of 0.03 is 0.00375, which rounds to 0.00
        let discount = discount_for(&CouponKind::Percent(Decimal::new(125, 1)), &brl(3))?;

        assert_eq!(discount, brl(0));

        Ok(())
    }

    #[test]
    fn full_percent_discount_equals_subtotal() -> TestResult {
        let discount = discount_for(&CouponKind::Percent(Decimal::ONE_HUNDRED), &brl(59_90))?;

        assert_eq!(discount, brl(59_90));

        Ok(())
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() -> TestResult {
        let discount = discount_for(&CouponKind::Fixed(brl(50_00)), &brl(30_00))?;

        assert_eq!(discount, brl(30_00));

        Ok(())
    }

    #[test]
    fn fixed_discount_below_subtotal_is_unchanged() -> TestResult {
        let discount = discount_for(&CouponKind::Fixed(brl(15_00)), &brl(30_00))?;

        assert_eq!(discount, brl(15_00));

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(Decimal::MAX, i64::MAX);

        assert_eq!(result, Err(DiscountError::PercentConversion));
    }
}
