//! Allocation error types.

use thiserror::Error;

/// Errors that can occur while validating an allocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// Allocation amounts must be strictly positive.
    #[error("Allocation amount must be strictly positive")]
    NonPositiveAmount,

    /// The requested amount exceeds what the debt still owes.
    #[error(
        "Allocation of {requested_cents} cents exceeds the remaining due of {remaining_cents} cents"
    )]
    InsufficientDebtCapacity {
        /// Requested allocation amount in cents.
        requested_cents: i64,
        /// Remaining due on the debt in cents.
        remaining_cents: i64,
    },

    /// The requested amount exceeds what the funding source has left.
    #[error(
        "Allocation of {requested_cents} cents exceeds the source capacity of {remaining_cents} cents"
    )]
    InsufficientSourceCapacity {
        /// Requested allocation amount in cents.
        requested_cents: i64,
        /// Remaining capacity on the source in cents.
        remaining_cents: i64,
    },
}

impl AllocationError {
    /// Returns the stable error code surfaced at the boundary.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "VALIDATION_ERROR",
            Self::InsufficientDebtCapacity { .. } => "INSUFFICIENT_DEBT_CAPACITY",
            Self::InsufficientSourceCapacity { .. } => "INSUFFICIENT_SOURCE_CAPACITY",
        }
    }
}
