//! Cart Lines

use rusty_money::{Money, iso};

use crate::pricing::PricingError;

/// A priced cart line: the unit price captured when the variant was added, and a quantity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line<'a> {
    unit_price: Money<'a, iso::Currency>,
    quantity: u32,
}

impl<'a> Line<'a> {
    /// Creates a new line with the given unit price and quantity
    pub fn new(unit_price: Money<'a, iso::Currency>, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// Returns the unit price of the line
    pub fn unit_price(&self) -> &Money<'a, iso::Currency> {
        &self.unit_price
    }

    /// Returns the quantity of the line
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidQuantity`]: the quantity is zero.
    /// - [`PricingError::NegativePrice`]: the unit price is below zero.
    /// - [`PricingError::Overflow`]: the product does not fit in minor units.
    pub fn total(&self) -> Result<Money<'a, iso::Currency>, PricingError> {
        if self.quantity == 0 {
            return Err(PricingError::InvalidQuantity);
        }

        let unit_minor = self.unit_price.to_minor_units();

        if unit_minor < 0 {
            return Err(PricingError::NegativePrice);
        }

        let total_minor = unit_minor
            .checked_mul(i64::from(self.quantity))
            .ok_or(PricingError::Overflow)?;

        Ok(Money::from_minor(total_minor, self.unit_price.currency()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn total_multiplies_unit_price_by_quantity() -> TestResult {
        let line = Line::new(Money::from_minor(45_90, iso::BRL), 3);

        assert_eq!(line.total()?, Money::from_minor(137_70, iso::BRL));

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let line = Line::new(Money::from_minor(10_00, iso::BRL), 0);

        assert!(matches!(line.total(), Err(PricingError::InvalidQuantity)));
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        let line = Line::new(Money::from_minor(-1, iso::BRL), 1);

        assert!(matches!(line.total(), Err(PricingError::NegativePrice)));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let line = Line::new(Money::from_minor(i64::MAX, iso::BRL), 2);

        assert!(matches!(line.total(), Err(PricingError::Overflow)));
    }
}
