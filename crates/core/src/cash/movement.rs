//! Cash movement kinds and amount signing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CashError;

/// The kind of a cash movement within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Cash added to the drawer.
    PayIn,
    /// Cash taken from the drawer for an expense.
    PayOut,
    /// Cash removed from the drawer (bank deposit, safe drop).
    Withdrawal,
    /// Incoming leg of an inter-register transfer.
    TransferIn,
    /// Outgoing leg of an inter-register transfer.
    TransferOut,
}

impl MovementKind {
    /// Returns true for kinds that remove cash from the drawer.
    #[must_use]
    pub const fn is_outflow(self) -> bool {
        matches!(self, Self::PayOut | Self::Withdrawal | Self::TransferOut)
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::PayIn => "PAY_IN",
            Self::PayOut => "PAY_OUT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::TransferIn => "TRANSFER_IN",
            Self::TransferOut => "TRANSFER_OUT",
        };
        write!(f, "{label}")
    }
}

/// Derives the signed amount stored for a movement from the positive input
/// amount: outflow kinds are stored negative, inflow kinds positive.
///
/// # Errors
///
/// Returns [`CashError::NonPositiveAmount`] when `amount` is not strictly
/// positive.
pub fn signed_amount(kind: MovementKind, amount: Decimal) -> Result<Decimal, CashError> {
    if amount <= Decimal::ZERO {
        return Err(CashError::NonPositiveAmount);
    }

    if kind.is_outflow() {
        Ok(-amount)
    } else {
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(MovementKind::PayIn, dec!(50), dec!(50))]
    #[case(MovementKind::TransferIn, dec!(50), dec!(50))]
    #[case(MovementKind::PayOut, dec!(50), dec!(-50))]
    #[case(MovementKind::Withdrawal, dec!(12.34), dec!(-12.34))]
    #[case(MovementKind::TransferOut, dec!(0.01), dec!(-0.01))]
    fn test_signing(#[case] kind: MovementKind, #[case] input: Decimal, #[case] stored: Decimal) {
        assert_eq!(signed_amount(kind, input), Ok(stored));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    fn test_rejects_non_positive_input(#[case] amount: Decimal) {
        assert_eq!(
            signed_amount(MovementKind::PayIn, amount),
            Err(CashError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_display_matches_wire_labels() {
        assert_eq!(MovementKind::PayOut.to_string(), "PAY_OUT");
        assert_eq!(MovementKind::TransferIn.to_string(), "TRANSFER_IN");
    }
}
