//! Integration tests for checkout totals and coupon discounts

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::BRL};
use testresult::TestResult;

use pawcart::{Coupon, CouponKind, EvaluationError, Ineligibility, Line, evaluate};

fn brl(minor: i64) -> Money<'static, rusty_money::iso::Currency> {
    Money::from_minor(minor, BRL)
}

#[test]
fn save10_on_two_fifty_real_items() -> TestResult {
    let lines = [Line::new(brl(50_00), 2)];
    let coupon = Coupon::new("SAVE10", CouponKind::Percent(Decimal::TEN))?
        .with_minimum_amount(brl(0));

    let totals = evaluate(&lines, Some(&coupon), BRL, Timestamp::now())?;

    assert_eq!(totals.subtotal, brl(100_00));
    assert_eq!(totals.discount, brl(10_00));
    assert_eq!(totals.total, brl(90_00));

    Ok(())
}

#[test]
fn evaluating_twice_yields_identical_totals() -> TestResult {
    let lines = [Line::new(brl(19_90), 3), Line::new(brl(7_45), 1)];
    let coupon =
        Coupon::new("PETS", CouponKind::Percent(Decimal::new(125, 1)))?.with_usage(Some(10), 3);
    let now = Timestamp::now();

    let first = evaluate(&lines, Some(&coupon), BRL, now)?;
    let second = evaluate(&lines, Some(&coupon), BRL, now)?;

    assert_eq!(first, second);
    assert_eq!(coupon.usage_count(), 3);

    Ok(())
}

#[test]
fn discount_stays_within_subtotal_for_every_percent() -> TestResult {
    let subtotals = [1, 3, 99, 1_00, 12_345, 99_999, 1_000_000_01];
    let now = Timestamp::now();

    for percent in 0..=100 {
        let coupon = Coupon::new("SWEEP", CouponKind::Percent(Decimal::from(percent)))?;

        for unit in subtotals {
            let totals = evaluate(&[Line::new(brl(unit), 1)], Some(&coupon), BRL, now)?;

            let discount = totals.discount.to_minor_units();
            let subtotal = totals.subtotal.to_minor_units();

            assert!(
                (0..=subtotal).contains(&discount),
                "discount {discount} outside 0..={subtotal} at {percent}%"
            );
            assert_eq!(totals.total.to_minor_units(), subtotal - discount);
        }
    }

    Ok(())
}

#[test]
fn fixed_coupon_larger_than_subtotal_zeroes_total() -> TestResult {
    let coupon = Coupon::new("BIGOFF", CouponKind::Fixed(brl(500_00)))?;

    let totals = evaluate(&[Line::new(brl(39_90), 2)], Some(&coupon), BRL, Timestamp::now())?;

    assert_eq!(totals.discount, totals.subtotal);
    assert_eq!(totals.total, brl(0));

    Ok(())
}

#[test]
fn percent_rounding_happens_once_on_the_subtotal() -> TestResult {
    // Per-line rounding would give 0.02 + 0.02 = 0.04; the subtotal 0.30 gives 0.045 -> 0.05
    let lines = [Line::new(brl(15), 1), Line::new(brl(15), 1)];
    let coupon = Coupon::new("HALF15", CouponKind::Percent(Decimal::new(15, 0)))?;

    let totals = evaluate(&lines, Some(&coupon), BRL, Timestamp::now())?;

    assert_eq!(totals.discount, brl(5));
    assert_eq!(totals.total, brl(25));

    Ok(())
}

#[test]
fn exhausted_coupon_is_rejected_even_when_otherwise_valid() -> TestResult {
    let coupon = Coupon::new("LIMITED", CouponKind::Percent(Decimal::TEN))?.with_usage(Some(2), 2);

    let result = evaluate(&[Line::new(brl(100_00), 1)], Some(&coupon), BRL, Timestamp::now());

    assert_eq!(
        result,
        Err(EvaluationError::Ineligible(Ineligibility::UsageLimitReached { limit: 2 }))
    );

    Ok(())
}
