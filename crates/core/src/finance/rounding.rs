//! Monetary rounding helpers.
//!
//! All derived amounts round to 2 decimal places using Banker's Rounding
//! (`MidpointNearestEven`) so repeated derivations do not drift upward.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Rounds a monetary amount to 2 decimal places using Banker's Rounding.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Splits an amount into two halves that sum exactly to the original.
///
/// The first half is rounded to 2 decimal places; the second is the exact
/// remainder, so an odd minor unit never disappears.
#[must_use]
pub fn half_split(amount: Decimal) -> (Decimal, Decimal) {
    let first = round_money(amount / Decimal::TWO);
    (first, amount - first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_bankers() {
        // Midpoints round to nearest even at 2 decimals.
        assert_eq!(round_money(dec!(2.125)), dec!(2.12));
        assert_eq!(round_money(dec!(2.135)), dec!(2.14));
        assert_eq!(round_money(dec!(45833.33333)), dec!(45833.33));
    }

    #[test]
    fn test_half_split_sums_exactly() {
        let (a, b) = half_split(dec!(1525.00));
        assert_eq!(a, dec!(762.50));
        assert_eq!(b, dec!(762.50));

        let (a, b) = half_split(dec!(0.03));
        assert_eq!(a + b, dec!(0.03));

        let (a, b) = half_split(dec!(99.99));
        assert_eq!(a + b, dec!(99.99));
    }
}
