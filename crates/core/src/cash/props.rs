//! Property-based tests for cash session arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::movement::{MovementKind, signed_amount};
use super::session::{CloseInput, compute_close};

/// Strategy for positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for signed amounts.
fn signed_total() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for movement kinds.
fn movement_kind() -> impl Strategy<Value = MovementKind> {
    prop_oneof![
        Just(MovementKind::PayIn),
        Just(MovementKind::PayOut),
        Just(MovementKind::Withdrawal),
        Just(MovementKind::TransferIn),
        Just(MovementKind::TransferOut),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Signing preserves the magnitude and maps kind to direction.
    #[test]
    fn prop_signed_amount_magnitude_and_direction(
        kind in movement_kind(),
        amount in positive_amount(),
    ) {
        let stored = signed_amount(kind, amount).expect("positive amount must sign");
        prop_assert_eq!(stored.abs(), amount);
        if kind.is_outflow() {
            prop_assert!(stored.is_sign_negative());
        } else {
            prop_assert!(!stored.is_sign_negative());
        }
    }

    /// A transfer's two legs always cancel out across registers.
    #[test]
    fn prop_transfer_legs_cancel(amount in positive_amount()) {
        let out = signed_amount(MovementKind::TransferOut, amount).unwrap();
        let incoming = signed_amount(MovementKind::TransferIn, amount).unwrap();
        prop_assert_eq!(out + incoming, Decimal::ZERO);
    }

    /// The close difference is exactly counted minus expected, whatever the
    /// inputs.
    #[test]
    fn prop_close_difference_is_counted_minus_expected(
        opening in positive_amount(),
        movements in signed_total(),
        sales in positive_amount(),
        refunds in positive_amount(),
        counted in positive_amount(),
    ) {
        let outcome = compute_close(&CloseInput {
            opening_balance: opening,
            movements_total: movements,
            cash_sales_total: sales,
            cash_refunds_total: refunds,
            counted_balance: counted,
        });

        prop_assert_eq!(
            outcome.expected_balance,
            opening + sales + movements - refunds
        );
        prop_assert_eq!(outcome.difference, counted - outcome.expected_balance);
    }

    /// Counting exactly the expected amount yields a zero difference.
    #[test]
    fn prop_exact_count_zero_difference(
        opening in positive_amount(),
        movements in signed_total(),
        sales in positive_amount(),
        refunds in positive_amount(),
    ) {
        let expected = opening + sales + movements - refunds;
        let outcome = compute_close(&CloseInput {
            opening_balance: opening,
            movements_total: movements,
            cash_sales_total: sales,
            cash_refunds_total: refunds,
            counted_balance: expected,
        });

        prop_assert_eq!(outcome.difference, Decimal::ZERO);
    }
}
