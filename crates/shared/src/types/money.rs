//! Monetary helpers with integer-cent precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are carried as `rust_decimal::Decimal` at rest and converted to
//! integer cents for all capacity and equality arithmetic, so that
//! "fully allocated" is an exact comparison rather than a float guess.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Comparison tolerance for decimal amounts: one cent.
#[must_use]
pub fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Converts a decimal amount to integer cents.
///
/// The amount is rounded half-away-from-zero at two decimal places before
/// conversion. Values outside the `i64` cent range saturate at the range
/// bounds rather than wrapping.
#[must_use]
pub fn to_cents(amount: Decimal) -> i64 {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let saturated = if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    };
    rounded
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.to_i64())
        .unwrap_or(saturated)
}

/// Converts integer cents back to a decimal amount.
#[must_use]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Returns true when two decimal amounts are equal within one cent.
#[must_use]
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < tolerance()
}

/// Returns true when a decimal amount is zero within one cent.
#[must_use]
pub fn approx_zero(amount: Decimal) -> bool {
    amount.abs() < tolerance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), 0)]
    #[case(dec!(300.00), 30000)]
    #[case(dec!(0.01), 1)]
    #[case(dec!(-12.34), -1234)]
    #[case(dec!(99.999), 10000)]
    #[case(dec!(99.994), 9999)]
    #[case(dec!(0.005), 1)]
    fn test_to_cents(#[case] amount: Decimal, #[case] expected: i64) {
        assert_eq!(to_cents(amount), expected);
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(from_cents(30000), dec!(300.00));
        assert_eq!(from_cents(-1234), dec!(-12.34));
        assert_eq!(from_cents(0), Decimal::ZERO);
    }

    #[test]
    fn test_round_trip() {
        for cents in [0i64, 1, -1, 12345, -987654, 1_000_000_000] {
            assert_eq!(to_cents(from_cents(cents)), cents);
        }
    }

    #[test]
    fn test_saturates_instead_of_wrapping() {
        let huge = Decimal::MAX;
        assert_eq!(to_cents(huge), i64::MAX);
        assert_eq!(to_cents(-huge), i64::MIN);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(dec!(100.00), dec!(100.005)));
        assert!(!approx_eq(dec!(100.00), dec!(100.01)));
        assert!(approx_eq(dec!(-5), dec!(-5.009)));
    }

    #[test]
    fn test_approx_zero() {
        assert!(approx_zero(dec!(0.009)));
        assert!(approx_zero(dec!(-0.009)));
        assert!(!approx_zero(dec!(0.01)));
    }
}
