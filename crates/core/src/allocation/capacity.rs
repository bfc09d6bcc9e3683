//! Capacity checks and reconciliation planning.
//!
//! The persistence layer recomputes the allocated sums from the live
//! allocation set inside its transaction and hands them here; these
//! functions decide whether an allocation fits and how a source should be
//! spread across several invoices.

use comptoir_shared::types::InvoiceId;

use super::error::AllocationError;

/// Remaining capacity in cents: what a debt still owes, or what a source
/// still has to give.
#[must_use]
pub const fn remaining_cents(total_cents: i64, allocated_cents: i64) -> i64 {
    total_cents - allocated_cents
}

/// A single allocation request with the recomputed state of both sides.
#[derive(Debug, Clone, Copy)]
pub struct AllocationRequest {
    /// Requested allocation amount in cents.
    pub amount_cents: i64,
    /// The debt's total in cents.
    pub debt_total_cents: i64,
    /// Sum of the debt's active allocations in cents.
    pub debt_allocated_cents: i64,
    /// The source's full amount in cents.
    pub source_amount_cents: i64,
    /// Sum of the source's active allocations in cents.
    pub source_allocated_cents: i64,
}

/// Validates an allocation against both sides' remaining capacity.
///
/// # Errors
///
/// - [`AllocationError::NonPositiveAmount`] for a zero or negative amount
/// - [`AllocationError::InsufficientDebtCapacity`] when the amount exceeds
///   the debt's remaining due
/// - [`AllocationError::InsufficientSourceCapacity`] when the amount
///   exceeds the source's remaining capacity
pub const fn check_allocation(request: &AllocationRequest) -> Result<(), AllocationError> {
    if request.amount_cents <= 0 {
        return Err(AllocationError::NonPositiveAmount);
    }

    let remaining_due = remaining_cents(request.debt_total_cents, request.debt_allocated_cents);
    if request.amount_cents > remaining_due {
        return Err(AllocationError::InsufficientDebtCapacity {
            requested_cents: request.amount_cents,
            remaining_cents: remaining_due,
        });
    }

    let remaining_capacity =
        remaining_cents(request.source_amount_cents, request.source_allocated_cents);
    if request.amount_cents > remaining_capacity {
        return Err(AllocationError::InsufficientSourceCapacity {
            requested_cents: request.amount_cents,
            remaining_cents: remaining_capacity,
        });
    }

    Ok(())
}

/// A debt targeted by a reconciliation run, with its remaining due already
/// recomputed from the live allocation set.
#[derive(Debug, Clone, Copy)]
pub struct DebtTarget {
    /// The debt's row id.
    pub debt_id: InvoiceId,
    /// Remaining due in cents.
    pub remaining_due_cents: i64,
}

/// Plans a greedy reconciliation of one source across several debts.
///
/// Debts are consumed in the order given (callers sort by due date);
/// each receives `min(source remaining, debt remaining due)` until the
/// source is exhausted. Debts with nothing due are skipped.
#[must_use]
pub fn plan_reconciliation(
    source_remaining_cents: i64,
    targets: &[DebtTarget],
) -> Vec<(InvoiceId, i64)> {
    let mut remaining = source_remaining_cents;
    let mut plan = Vec::new();

    for target in targets {
        if remaining <= 0 {
            break;
        }
        let amount = remaining.min(target.remaining_due_cents);
        if amount > 0 {
            plan.push((target.debt_id, amount));
            remaining -= amount;
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: i64, debt_allocated: i64, source_allocated: i64) -> AllocationRequest {
        AllocationRequest {
            amount_cents: amount,
            debt_total_cents: 30000,
            debt_allocated_cents: debt_allocated,
            source_amount_cents: 50000,
            source_allocated_cents: source_allocated,
        }
    }

    #[test]
    fn test_rejects_zero_amount() {
        assert_eq!(
            check_allocation(&request(0, 0, 0)),
            Err(AllocationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_rejects_negative_amount() {
        assert_eq!(
            check_allocation(&request(-100, 0, 0)),
            Err(AllocationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_accepts_exact_remaining_due() {
        assert!(check_allocation(&request(30000, 0, 0)).is_ok());
    }

    #[test]
    fn test_rejects_one_cent_over_due() {
        assert_eq!(
            check_allocation(&request(30001, 0, 0)),
            Err(AllocationError::InsufficientDebtCapacity {
                requested_cents: 30001,
                remaining_cents: 30000,
            })
        );
    }

    #[test]
    fn test_rejects_over_source_capacity() {
        // Debt has room (10000 of 30000 allocated) but the source has only
        // 2000 cents left.
        assert_eq!(
            check_allocation(&request(5000, 10000, 48000)),
            Err(AllocationError::InsufficientSourceCapacity {
                requested_cents: 5000,
                remaining_cents: 2000,
            })
        );
    }

    #[test]
    fn test_partial_then_exact_completion() {
        assert!(check_allocation(&request(10000, 0, 0)).is_ok());
        assert!(check_allocation(&request(20000, 10000, 10000)).is_ok());
        assert!(check_allocation(&request(1, 30000, 30000)).is_err());
    }

    #[test]
    fn test_plan_spreads_in_order() {
        let a = InvoiceId::new();
        let b = InvoiceId::new();
        let c = InvoiceId::new();
        let targets = [
            DebtTarget { debt_id: a, remaining_due_cents: 10000 },
            DebtTarget { debt_id: b, remaining_due_cents: 20000 },
            DebtTarget { debt_id: c, remaining_due_cents: 5000 },
        ];

        let plan = plan_reconciliation(25000, &targets);
        assert_eq!(plan, vec![(a, 10000), (b, 15000)]);
    }

    #[test]
    fn test_plan_skips_settled_debts() {
        let a = InvoiceId::new();
        let b = InvoiceId::new();
        let targets = [
            DebtTarget { debt_id: a, remaining_due_cents: 0 },
            DebtTarget { debt_id: b, remaining_due_cents: 500 },
        ];

        let plan = plan_reconciliation(1000, &targets);
        assert_eq!(plan, vec![(b, 500)]);
    }

    #[test]
    fn test_plan_with_exhausted_source_is_empty() {
        let targets = [DebtTarget {
            debt_id: InvoiceId::new(),
            remaining_due_cents: 1000,
        }];
        assert!(plan_reconciliation(0, &targets).is_empty());
    }
}
