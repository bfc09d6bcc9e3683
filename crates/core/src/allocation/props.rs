//! Property-based tests for the allocation engine.
//!
//! - Status derivation is consistent with the capacity check
//! - A validated allocation can never push the allocated sum past the total
//! - Reconciliation plans respect both sides' remaining capacity

use comptoir_shared::types::InvoiceId;
use proptest::prelude::*;

use super::capacity::{AllocationRequest, DebtTarget, check_allocation, plan_reconciliation};
use super::status::{DebtStatus, SourceStatus, derive_debt_status, derive_source_status};

/// Strategy for totals (0.01 to 100,000.00 in cents).
fn total_cents() -> impl Strategy<Value = i64> {
    1i64..10_000_000i64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A debt whose allocations were always validated can never report an
    /// allocated sum above its total, and its status ladder follows the sum.
    #[test]
    fn prop_validated_allocation_preserves_debt_invariant(
        total in total_cents(),
        allocated in total_cents(),
        amount in 1i64..20_000_000i64,
    ) {
        let allocated = allocated.min(total);
        let request = AllocationRequest {
            amount_cents: amount,
            debt_total_cents: total,
            debt_allocated_cents: allocated,
            source_amount_cents: i64::MAX / 2,
            source_allocated_cents: 0,
        };

        if check_allocation(&request).is_ok() {
            let new_allocated = request.debt_allocated_cents + amount;
            prop_assert!(new_allocated <= total, "validated allocation exceeded the total");
            if new_allocated == total {
                prop_assert_eq!(derive_debt_status(total, new_allocated), DebtStatus::Paid);
            } else {
                prop_assert_eq!(derive_debt_status(total, new_allocated), DebtStatus::PartiallyPaid);
            }
        }
    }

    /// The source-side mirror of the debt invariant.
    #[test]
    fn prop_validated_allocation_preserves_source_invariant(
        amount_cents in 1i64..10_000_000i64,
        source_total in total_cents(),
        source_allocated in total_cents(),
    ) {
        let source_allocated = source_allocated.min(source_total);
        let request = AllocationRequest {
            amount_cents,
            debt_total_cents: i64::MAX / 2,
            debt_allocated_cents: 0,
            source_amount_cents: source_total,
            source_allocated_cents: source_allocated,
        };

        if check_allocation(&request).is_ok() {
            let new_allocated = source_allocated + amount_cents;
            prop_assert!(new_allocated <= source_total);
            prop_assert_ne!(
                derive_source_status(source_total, new_allocated),
                SourceStatus::Available
            );
        }
    }

    /// Status derivation is a total ladder: exactly one status per sum, and
    /// the boundaries are exact in cents.
    #[test]
    fn prop_status_ladder_is_exact(
        total in total_cents(),
        allocated in total_cents(),
    ) {
        let allocated = allocated.min(total);
        let status = derive_debt_status(total, allocated);
        match status {
            DebtStatus::Paid => prop_assert_eq!(allocated, total),
            DebtStatus::PartiallyPaid => prop_assert!(allocated > 0 && allocated < total),
            DebtStatus::Unpaid => prop_assert_eq!(allocated, 0),
        }
    }

    /// A reconciliation plan never over-allocates the source nor any debt,
    /// and preserves the given ordering.
    #[test]
    fn prop_reconciliation_plan_is_bounded(
        source in 0i64..5_000_000i64,
        dues in prop::collection::vec(0i64..1_000_000i64, 0..12),
    ) {
        let targets: Vec<DebtTarget> = dues
            .iter()
            .map(|&due| DebtTarget { debt_id: InvoiceId::new(), remaining_due_cents: due })
            .collect();

        let plan = plan_reconciliation(source, &targets);

        let planned_total: i64 = plan.iter().map(|(_, cents)| cents).sum();
        prop_assert!(planned_total <= source, "plan exceeds the source remaining");

        let mut cursor = 0usize;
        for (debt_id, cents) in &plan {
            prop_assert!(*cents > 0);
            // Each planned debt appears in input order with a bounded amount.
            let position = targets[cursor..]
                .iter()
                .position(|t| t.debt_id == *debt_id)
                .expect("planned debt missing from targets");
            let target = &targets[cursor + position];
            prop_assert!(*cents <= target.remaining_due_cents);
            cursor += position + 1;
        }
    }

    /// Planning with a source that covers everything settles every debt
    /// with a positive due.
    #[test]
    fn prop_full_coverage_settles_all(
        dues in prop::collection::vec(1i64..100_000i64, 1..10),
    ) {
        let total: i64 = dues.iter().sum();
        let targets: Vec<DebtTarget> = dues
            .iter()
            .map(|&due| DebtTarget { debt_id: InvoiceId::new(), remaining_due_cents: due })
            .collect();

        let plan = plan_reconciliation(total, &targets);
        prop_assert_eq!(plan.len(), targets.len());
        for ((_, planned), target) in plan.iter().zip(&targets) {
            prop_assert_eq!(*planned, target.remaining_due_cents);
        }
    }
}
