//! Allocation ledger logic.
//!
//! This module implements the pure half of the allocation engine:
//! - Status derivation for debts, fund sources, and credit notes
//! - Capacity checks for a single allocation
//! - Greedy planning for multi-invoice reconciliation
//! - Error types for allocation operations
//!
//! Everything here operates on integer cents fed in by the persistence
//! layer; no amount is trusted unless it was recomputed from the live
//! allocation set.

pub mod capacity;
pub mod error;
pub mod status;

#[cfg(test)]
mod props;

pub use capacity::{AllocationRequest, DebtTarget, check_allocation, plan_reconciliation, remaining_cents};
pub use error::AllocationError;
pub use status::{CreditStatus, DebtStatus, SourceStatus, derive_credit_status, derive_debt_status, derive_source_status};
