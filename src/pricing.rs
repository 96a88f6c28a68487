//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while calculating line or total prices.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// Multiplying a unit price by its quantity overflowed.
    #[error("line total overflows: {unit_minor} x {quantity}")]
    Overflow {
        /// Unit price in minor units
        unit_minor: i64,
        /// Quantity
        quantity: u32,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the price of `quantity` units at `unit_price`.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: the minor-unit product does not fit in an `i64`.
pub fn line_total<'a>(
    unit_price: Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    let unit_minor = unit_price.to_minor_units();

    let minor = unit_minor
        .checked_mul(i64::from(quantity))
        .ok_or(TotalPriceError::Overflow {
            unit_minor,
            quantity,
        })?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Calculates the total price of `(unit price, quantity)` lines.
///
/// An empty set of lines totals zero in `currency`.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line total overflowed.
/// - [`TotalPriceError::Money`]: a line is priced in a different currency.
pub fn total_price<'a>(
    lines: impl IntoIterator<Item = (Money<'a, Currency>, u32)>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    lines
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, (unit_price, quantity)| {
            Ok(acc.add(line_total(unit_price, quantity)?)?)
        })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_minor_units() -> TestResult {
        let total = line_total(Money::from_minor(440, USD), 2)?;

        assert_eq!(total, Money::from_minor(880, USD));

        Ok(())
    }

    #[test]
    fn line_total_reports_overflow() {
        let result = line_total(Money::from_minor(i64::MAX, USD), 2);

        assert_eq!(
            result,
            Err(TotalPriceError::Overflow {
                unit_minor: i64::MAX,
                quantity: 2
            })
        );
    }

    #[test]
    fn total_price_sums_lines() -> TestResult {
        let lines = [
            (Money::from_minor(440, USD), 2),
            (Money::from_minor(180, USD), 1),
        ];

        assert_eq!(total_price(lines, USD)?, Money::from_minor(1060, USD));

        Ok(())
    }

    #[test]
    fn total_price_of_nothing_is_zero() -> TestResult {
        let lines: [(Money<'static, Currency>, u32); 0] = [];

        assert_eq!(total_price(lines, USD)?, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn total_price_rejects_mixed_currencies() {
        let lines = [(Money::from_minor(100, GBP), 1)];

        assert!(matches!(
            total_price(lines, USD),
            Err(TotalPriceError::Money(_))
        ));
    }
}
