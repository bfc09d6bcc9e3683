//! Cash session error types.

use thiserror::Error;

/// Errors that can occur while validating cash session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CashError {
    /// Opening balances cannot be negative.
    #[error("Opening balance must not be negative")]
    NegativeOpeningBalance,

    /// Counted closing balances cannot be negative.
    #[error("Closing balance must not be negative")]
    NegativeClosingBalance,

    /// Movement and transfer amounts must be strictly positive on input.
    #[error("Amount must be strictly positive")]
    NonPositiveAmount,

    /// A movement needs a non-empty reason for the audit trail.
    #[error("A reason is required")]
    MissingReason,

    /// Funds cannot be transferred from a register to itself.
    #[error("Source and destination registers must differ")]
    SameRegisterTransfer,
}

impl CashError {
    /// Returns the stable error code surfaced at the boundary.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeOpeningBalance
            | Self::NegativeClosingBalance
            | Self::NonPositiveAmount
            | Self::MissingReason => "VALIDATION_ERROR",
            Self::SameRegisterTransfer => "SAME_REGISTER_TRANSFER",
        }
    }
}
