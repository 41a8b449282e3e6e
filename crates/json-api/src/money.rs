//! Minor-unit amounts rendered as JSON numbers in reais.

use rust_decimal::Decimal;

/// `10_00` centavos becomes `10.00`.
pub(crate) fn major_units(minor: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(minor), 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centavos_become_reais() {
        assert_eq!(major_units(0), Decimal::ZERO);
        assert_eq!(major_units(5), Decimal::new(5, 2));
        assert_eq!(major_units(90_00), Decimal::from(90));
        assert_eq!(major_units(19_90).to_string(), "19.90");
    }
}
