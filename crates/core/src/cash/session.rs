//! Session open validation and close arithmetic.

use comptoir_shared::types::CashRegisterId;
use rust_decimal::Decimal;

use super::error::CashError;

/// Validates the opening balance for a new session.
///
/// # Errors
///
/// Returns [`CashError::NegativeOpeningBalance`] for a negative balance.
/// Zero is allowed: a register may legitimately start empty.
pub fn check_opening_balance(opening_balance: Decimal) -> Result<(), CashError> {
    if opening_balance < Decimal::ZERO {
        return Err(CashError::NegativeOpeningBalance);
    }
    Ok(())
}

/// Validates the database-free preconditions of an inter-register transfer.
///
/// # Errors
///
/// - [`CashError::NonPositiveAmount`] for a zero or negative amount
/// - [`CashError::MissingReason`] for an empty reason
/// - [`CashError::SameRegisterTransfer`] when both registers are the same
pub fn check_transfer(
    source_register_id: CashRegisterId,
    destination_register_id: CashRegisterId,
    amount: Decimal,
    reason: &str,
) -> Result<(), CashError> {
    if amount <= Decimal::ZERO {
        return Err(CashError::NonPositiveAmount);
    }
    if reason.trim().is_empty() {
        return Err(CashError::MissingReason);
    }
    if source_register_id == destination_register_id {
        return Err(CashError::SameRegisterTransfer);
    }
    Ok(())
}

/// Inputs to the session close computation, each sum recomputed from the
/// session's rows inside the closing transaction.
#[derive(Debug, Clone, Copy)]
pub struct CloseInput {
    /// The session's opening balance.
    pub opening_balance: Decimal,
    /// Sum of the session's signed cash movements.
    pub movements_total: Decimal,
    /// Sum of the cash payments captured during the session.
    pub cash_sales_total: Decimal,
    /// Sum of the cash refunds issued during the session.
    pub cash_refunds_total: Decimal,
    /// The counted drawer amount supplied by the closer.
    pub counted_balance: Decimal,
}

/// The derived closing figures of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOutcome {
    /// What the drawer should contain.
    pub expected_balance: Decimal,
    /// Counted minus expected; negative means missing cash.
    pub difference: Decimal,
}

/// Computes the expected balance and the counted-vs-expected difference
/// for a closing session.
#[must_use]
pub fn compute_close(input: &CloseInput) -> CloseOutcome {
    let expected_balance = input.opening_balance
        + input.cash_sales_total
        + input.movements_total
        - input.cash_refunds_total;

    CloseOutcome {
        expected_balance,
        difference: input.counted_balance - expected_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_opening_balance_zero_is_allowed() {
        assert!(check_opening_balance(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_opening_balance_negative_is_rejected() {
        assert_eq!(
            check_opening_balance(dec!(-0.01)),
            Err(CashError::NegativeOpeningBalance)
        );
    }

    #[test]
    fn test_transfer_rejects_same_register() {
        let register = CashRegisterId::new();
        assert_eq!(
            check_transfer(register, register, dec!(50), "float adjustment"),
            Err(CashError::SameRegisterTransfer)
        );
    }

    #[test]
    fn test_transfer_rejects_blank_reason() {
        assert_eq!(
            check_transfer(CashRegisterId::new(), CashRegisterId::new(), dec!(50), "   "),
            Err(CashError::MissingReason)
        );
    }

    #[test]
    fn test_transfer_rejects_non_positive_amount() {
        assert_eq!(
            check_transfer(CashRegisterId::new(), CashRegisterId::new(), dec!(0), "x"),
            Err(CashError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_close_balances_even() {
        let outcome = compute_close(&CloseInput {
            opening_balance: dec!(100),
            movements_total: dec!(-20),
            cash_sales_total: dec!(250),
            cash_refunds_total: dec!(30),
            counted_balance: dec!(300),
        });

        assert_eq!(outcome.expected_balance, dec!(300));
        assert_eq!(outcome.difference, Decimal::ZERO);
    }

    #[test]
    fn test_close_detects_missing_cash() {
        let outcome = compute_close(&CloseInput {
            opening_balance: dec!(100),
            movements_total: Decimal::ZERO,
            cash_sales_total: dec!(50),
            cash_refunds_total: Decimal::ZERO,
            counted_balance: dec!(140),
        });

        assert_eq!(outcome.expected_balance, dec!(150));
        assert_eq!(outcome.difference, dec!(-10));
    }

    #[test]
    fn test_close_with_surplus() {
        let outcome = compute_close(&CloseInput {
            opening_balance: dec!(80),
            movements_total: dec!(15.50),
            cash_sales_total: Decimal::ZERO,
            cash_refunds_total: dec!(5.50),
            counted_balance: dec!(100),
        });

        assert_eq!(outcome.expected_balance, dec!(90));
        assert_eq!(outcome.difference, dec!(10));
    }
}
