//! Pricing

use rusty_money::{Money, MoneyError, iso};
use thiserror::Error;

use crate::lines::Line;

/// Errors that can occur while pricing cart lines.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line has a zero quantity.
    #[error("cart line quantity must be at least one")]
    InvalidQuantity,

    /// A line has a unit price below zero.
    #[error("cart line unit price must not be negative")]
    NegativePrice,

    /// An amount does not fit in minor units.
    #[error("amount overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the subtotal of a list of cart lines in the given currency.
///
/// An empty list has a zero subtotal.
///
/// # Errors
///
/// - [`PricingError::InvalidQuantity`], [`PricingError::NegativePrice`],
///   [`PricingError::Overflow`]:
///   a line could not be totalled.
/// - [`PricingError::Money`]: a line is priced in a different currency.
pub fn subtotal<'a>(
    lines: &[Line<'a>],
    currency: &'a iso::Currency,
) -> Result<Money<'a, iso::Currency>, PricingError> {
    lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            Ok(acc.add(line.total()?)?)
        })
}
