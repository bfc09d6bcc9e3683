//! Status derivation for debts, fund sources, and credit notes.
//!
//! Statuses are projections of the allocation set, never independent truth.
//! These functions are total over their inputs and never yield the terminal
//! DRAFT/VOID states — only explicit workflow operations may set those, and
//! callers must skip recomputation entirely for a VOID entity.

use serde::{Deserialize, Serialize};

/// Derived settlement status of a debt (customer or supplier invoice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtStatus {
    /// No active allocation covers any part of the total.
    Unpaid,
    /// Allocations cover part of the total.
    PartiallyPaid,
    /// Allocations cover the full total.
    Paid,
}

/// Derived status of a fund source (payment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceStatus {
    /// Nothing allocated from this source yet.
    Available,
    /// Part of the source amount is allocated.
    PartiallyAllocated,
    /// The full source amount is allocated.
    FullyAllocated,
}

/// Derived status of a credit note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditStatus {
    /// The full initial amount remains available.
    Available,
    /// Part of the initial amount has been used.
    PartiallyUsed,
    /// Nothing remains to allocate.
    FullyUsed,
}

/// Derives a debt's status from its total and the sum of its active
/// allocations, both in integer cents.
///
/// Equality is exact in cents; the persistence layer is responsible for
/// converting decimal amounts with [`comptoir_shared::types::money::to_cents`].
#[must_use]
pub const fn derive_debt_status(total_cents: i64, allocated_cents: i64) -> DebtStatus {
    if allocated_cents >= total_cents {
        DebtStatus::Paid
    } else if allocated_cents > 0 {
        DebtStatus::PartiallyPaid
    } else {
        DebtStatus::Unpaid
    }
}

/// Derives a fund source's status from its amount and the sum of its
/// active allocations, both in integer cents.
#[must_use]
pub const fn derive_source_status(amount_cents: i64, allocated_cents: i64) -> SourceStatus {
    if allocated_cents >= amount_cents {
        SourceStatus::FullyAllocated
    } else if allocated_cents > 0 {
        SourceStatus::PartiallyAllocated
    } else {
        SourceStatus::Available
    }
}

/// Derives a credit note's status from its initial and remaining amounts
/// in integer cents. `remaining_cents` must itself have been recomputed as
/// `initial − Σ(active allocations)`.
#[must_use]
pub const fn derive_credit_status(initial_cents: i64, remaining_cents: i64) -> CreditStatus {
    if remaining_cents <= 0 {
        CreditStatus::FullyUsed
    } else if remaining_cents >= initial_cents {
        CreditStatus::Available
    } else {
        CreditStatus::PartiallyUsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comptoir_shared::types::money::to_cents;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debt_status_unpaid() {
        assert_eq!(derive_debt_status(30000, 0), DebtStatus::Unpaid);
    }

    #[test]
    fn test_debt_status_partial() {
        assert_eq!(derive_debt_status(30000, 10000), DebtStatus::PartiallyPaid);
        assert_eq!(derive_debt_status(30000, 29999), DebtStatus::PartiallyPaid);
    }

    #[test]
    fn test_debt_status_paid_exactly_at_total() {
        assert_eq!(derive_debt_status(30000, 30000), DebtStatus::Paid);
    }

    #[test]
    fn test_debt_status_one_cent_short_stays_partial() {
        // Allocating 0.01 less than the total must not flip to Paid.
        let total = to_cents(dec!(300.00));
        let allocated = to_cents(dec!(299.99));
        assert_eq!(derive_debt_status(total, allocated), DebtStatus::PartiallyPaid);
    }

    #[test]
    fn test_source_status_ladder() {
        assert_eq!(derive_source_status(10000, 0), SourceStatus::Available);
        assert_eq!(
            derive_source_status(10000, 5000),
            SourceStatus::PartiallyAllocated
        );
        assert_eq!(
            derive_source_status(10000, 10000),
            SourceStatus::FullyAllocated
        );
    }

    #[test]
    fn test_credit_status_ladder() {
        assert_eq!(derive_credit_status(5000, 5000), CreditStatus::Available);
        assert_eq!(derive_credit_status(5000, 2500), CreditStatus::PartiallyUsed);
        assert_eq!(derive_credit_status(5000, 0), CreditStatus::FullyUsed);
    }

    #[test]
    fn test_zero_total_debt_is_paid() {
        // A zero-total debt has nothing left to cover.
        assert_eq!(derive_debt_status(0, 0), DebtStatus::Paid);
    }
}
