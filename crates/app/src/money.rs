//! Store currency and minor-unit amount helpers.

use std::num::TryFromIntError;

use rusty_money::{Money, iso};
use sqlx::{Row, postgres::PgRow};

/// Currency every price, discount and total in the store is held in.
pub const CURRENCY: &iso::Currency = iso::BRL;

/// Wrap a stored minor-unit amount as money in the store currency.
pub(crate) fn to_money(amount: u64) -> Result<Money<'static, iso::Currency>, TryFromIntError> {
    Ok(Money::from_minor(i64::try_from(amount)?, CURRENCY))
}

/// Unwrap money into a non-negative minor-unit amount.
pub(crate) fn to_amount(money: &Money<'_, iso::Currency>) -> Result<u64, TryFromIntError> {
    u64::try_from(money.to_minor_units())
}

pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_optional_amount(row: &PgRow, col: &str) -> Result<Option<u64>, sqlx::Error> {
    row.try_get::<Option<i64>, _>(col)?
        .map(u64::try_from)
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: col.to_string(),
            source: Box::new(e),
        })
}

pub(crate) fn try_get_count(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let count_i32: i32 = row.try_get(col)?;

    u32::try_from(count_i32).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_optional_count(row: &PgRow, col: &str) -> Result<Option<u32>, sqlx::Error> {
    row.try_get::<Option<i32>, _>(col)?
        .map(u32::try_from)
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: col.to_string(),
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn amounts_round_trip_through_money() -> TestResult {
        let money = to_money(129_90)?;

        assert_eq!(money, Money::from_minor(129_90, iso::BRL));
        assert_eq!(to_amount(&money)?, 129_90);

        Ok(())
    }

    #[test]
    fn negative_money_is_not_an_amount() {
        assert!(to_amount(&Money::from_minor(-1, CURRENCY)).is_err());
    }

    #[test]
    fn oversized_amount_is_rejected() {
        assert!(to_money(u64::MAX).is_err());
    }
}
