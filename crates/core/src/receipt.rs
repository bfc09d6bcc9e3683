//! Goods-receipt quantity validation.
//!
//! Receipt accumulation is what later blocks voiding a supplier invoice, so
//! the ledger enforces the ordered-quantity ceiling here rather than in the
//! boundary layer. Quantities allow a 0.001 tolerance: partial units are
//! legitimate for weighed goods.

use rust_decimal::Decimal;
use thiserror::Error;

/// Comparison tolerance for quantities.
#[must_use]
pub fn quantity_tolerance() -> Decimal {
    Decimal::new(1, 3)
}

/// Errors that can occur while validating a goods receipt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReceiptError {
    /// Receipt quantities must be strictly positive.
    #[error("Quantity to receive must be strictly positive")]
    NonPositiveQuantity,

    /// The receipt would exceed the ordered quantity.
    #[error("Quantity to receive ({requested}) exceeds the remaining quantity ({remaining})")]
    OverReceipt {
        /// Requested receipt quantity.
        requested: Decimal,
        /// Quantity still outstanding on the line.
        remaining: Decimal,
    },
}

impl ReceiptError {
    /// Returns the stable error code surfaced at the boundary.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity => "VALIDATION_ERROR",
            Self::OverReceipt { .. } => "OVER_RECEIPT",
        }
    }
}

/// Validates receiving `to_receive` units against a line that ordered
/// `ordered` and has already received `already_received`.
///
/// # Errors
///
/// - [`ReceiptError::NonPositiveQuantity`] for a zero or negative quantity
/// - [`ReceiptError::OverReceipt`] when the receipt would exceed the
///   ordered quantity beyond the tolerance
pub fn check_receipt(
    ordered: Decimal,
    already_received: Decimal,
    to_receive: Decimal,
) -> Result<(), ReceiptError> {
    if to_receive <= Decimal::ZERO {
        return Err(ReceiptError::NonPositiveQuantity);
    }

    let remaining = ordered - already_received;
    if to_receive > remaining + quantity_tolerance() {
        return Err(ReceiptError::OverReceipt {
            requested: to_receive,
            remaining,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rejects_zero_quantity() {
        assert_eq!(
            check_receipt(dec!(10), dec!(0), dec!(0)),
            Err(ReceiptError::NonPositiveQuantity)
        );
    }

    #[test]
    fn test_rejects_negative_quantity() {
        assert_eq!(
            check_receipt(dec!(10), dec!(0), dec!(-1)),
            Err(ReceiptError::NonPositiveQuantity)
        );
    }

    #[test]
    fn test_accepts_exact_remaining() {
        assert!(check_receipt(dec!(10), dec!(2), dec!(8)).is_ok());
    }

    #[test]
    fn test_accepts_within_tolerance() {
        assert!(check_receipt(dec!(10), dec!(2), dec!(8.001)).is_ok());
    }

    #[test]
    fn test_rejects_over_receipt() {
        assert_eq!(
            check_receipt(dec!(10), dec!(2), dec!(8.01)),
            Err(ReceiptError::OverReceipt {
                requested: dec!(8.01),
                remaining: dec!(8),
            })
        );
    }

    #[test]
    fn test_rejects_receipt_on_fully_received_line() {
        assert!(matches!(
            check_receipt(dec!(10), dec!(10), dec!(1)),
            Err(ReceiptError::OverReceipt { .. })
        ));
    }
}
