//! Repository abstractions for the ledger operations.
//!
//! Repositories own the transactional read-check-write sequences: every
//! mutating operation locks the rows it will write, recomputes derived
//! state from the live allocation set, and commits or rolls back as a
//! unit. Transactions aborted by a conflicting concurrent writer are
//! retried a bounded number of times before surfacing.

pub mod billing;
pub mod cash_session;
pub mod purchasing;

pub use billing::{
    BillingError, BillingRepository, ReconcileInput, ReconcileOutcome, SettleInvoiceInput,
    SettlementSource,
};
pub use cash_session::{
    CashSessionError, CashSessionRepository, CloseSessionInput, OpenSessionInput,
    RecordMovementInput, TransferFundsInput, TransferOutcome,
};
pub use purchasing::{
    PurchasingError, PurchasingRepository, ReceiveGoodsInput, SettleSupplierInvoiceInput,
};

use comptoir_core::allocation::{DebtStatus, SourceStatus};
use sea_orm::DbErr;

use crate::entities::sea_orm_active_enums::{InvoiceStatus, PaymentStatus};

/// Default bound on automatic transaction retries, overridable through
/// `LedgerConfig`.
pub(crate) const DEFAULT_MAX_TXN_RETRIES: u32 = 3;

/// Maps a derived debt status onto the invoice status enum.
///
/// DRAFT/VOID never come out of a derivation; callers skip recomputation
/// for VOID rows entirely.
pub(crate) const fn invoice_status_from(status: DebtStatus) -> InvoiceStatus {
    match status {
        DebtStatus::Paid => InvoiceStatus::Paid,
        DebtStatus::PartiallyPaid => InvoiceStatus::PartiallyPaid,
        DebtStatus::Unpaid => InvoiceStatus::Unpaid,
    }
}

/// Maps a derived source status onto the payment status enum.
pub(crate) const fn payment_status_from(status: SourceStatus) -> PaymentStatus {
    match status {
        SourceStatus::FullyAllocated => PaymentStatus::FullyAllocated,
        SourceStatus::PartiallyAllocated => PaymentStatus::PartiallyAllocated,
        SourceStatus::Available => PaymentStatus::Available,
    }
}

/// Returns true for store-level aborts caused by a conflicting concurrent
/// writer: serialization failures (40001) and deadlocks (40P01).
pub(crate) fn is_transient_db_conflict(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("40001")
        || message.contains("40P01")
        || message.contains("could not serialize access")
        || message.contains("deadlock detected")
}

/// Repository errors that participate in automatic transaction retry.
pub(crate) trait RetryableError: Sized {
    /// True when the error is a store-level conflict worth retrying.
    fn is_transient_conflict(&self) -> bool;
    /// Converts the final failed attempt into the surfaced
    /// concurrent-modification kind.
    fn into_concurrent_modification(self) -> Self;
}

/// Runs a transactional operation, retrying on store-level conflicts up to
/// `max_retries` times before surfacing the failure.
pub(crate) async fn with_txn_retry<T, E, F, Fut>(
    op_name: &str,
    max_retries: u32,
    f: F,
) -> Result<T, E>
where
    E: RetryableError,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match f().await {
            Err(err) if err.is_transient_conflict() => {
                if attempt >= max_retries {
                    return Err(err.into_concurrent_modification());
                }
                attempt += 1;
                tracing::warn!(
                    op = op_name,
                    attempt,
                    max_retries,
                    "transaction aborted by concurrent writer, retrying"
                );
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_status_mapping() {
        assert_eq!(invoice_status_from(DebtStatus::Paid), InvoiceStatus::Paid);
        assert_eq!(
            invoice_status_from(DebtStatus::PartiallyPaid),
            InvoiceStatus::PartiallyPaid
        );
        assert_eq!(invoice_status_from(DebtStatus::Unpaid), InvoiceStatus::Unpaid);
    }

    #[test]
    fn test_payment_status_mapping() {
        assert_eq!(
            payment_status_from(SourceStatus::FullyAllocated),
            PaymentStatus::FullyAllocated
        );
        assert_eq!(
            payment_status_from(SourceStatus::PartiallyAllocated),
            PaymentStatus::PartiallyAllocated
        );
        assert_eq!(
            payment_status_from(SourceStatus::Available),
            PaymentStatus::Available
        );
    }

    #[test]
    fn test_transient_conflict_detection() {
        let serialization = DbErr::Custom(
            "ERROR: could not serialize access due to concurrent update (SQLSTATE 40001)".into(),
        );
        assert!(is_transient_db_conflict(&serialization));

        let deadlock = DbErr::Custom("ERROR: deadlock detected (SQLSTATE 40P01)".into());
        assert!(is_transient_db_conflict(&deadlock));

        let other = DbErr::Custom("ERROR: unique constraint violation".into());
        assert!(!is_transient_db_conflict(&other));
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_bound() {
        let attempts = std::sync::atomic::AtomicU32::new(0);
        let result: Result<(), BillingError> = with_txn_retry("test.op", 2, || {
            attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async { Err(BillingError::Database(DbErr::Custom("40001".into()))) }
        })
        .await;

        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(BillingError::ConcurrentModification(_))
        ));
    }

    #[tokio::test]
    async fn test_retry_passes_through_business_errors() {
        let attempts = std::sync::atomic::AtomicU32::new(0);
        let invoice_id = uuid::Uuid::new_v4();
        let result: Result<(), BillingError> = with_txn_retry("test.op", 2, || {
            attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move { Err(BillingError::InvoiceNotFound(invoice_id)) }
        })
        .await;

        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(matches!(result, Err(BillingError::InvoiceNotFound(_))));
    }
}
