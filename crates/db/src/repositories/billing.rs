//! Billing repository for the customer-side allocation engine.
//!
//! Implements settlement (allocating a payment or credit note against an
//! invoice), deallocation, multi-invoice reconciliation, and the customer
//! void workflow. Every operation is a single transaction that locks the
//! rows it will write and recomputes derived state from the live
//! allocation set.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use comptoir_core::allocation::{
    AllocationError, AllocationRequest, CreditStatus, DebtTarget, check_allocation,
    derive_credit_status, derive_debt_status, derive_source_status, plan_reconciliation,
    remaining_cents,
};
use comptoir_shared::types::InvoiceId;
use comptoir_shared::types::money::{from_cents, to_cents};

use crate::entities::{
    credit_note_allocations, credit_notes, invoices, payment_allocations, payments,
    sea_orm_active_enums::{CreditNoteStatus, InvoiceStatus},
};

use super::{
    DEFAULT_MAX_TXN_RETRIES, RetryableError, invoice_status_from, is_transient_db_conflict,
    payment_status_from, with_txn_retry,
};

/// Error types for billing operations.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Credit note not found.
    #[error("Credit note not found: {0}")]
    CreditNoteNotFound(Uuid),

    /// Allocation not found.
    #[error("Allocation not found: {0}")]
    AllocationNotFound(Uuid),

    /// Void invoices cannot receive allocations.
    #[error("Invoice {0} is void and cannot receive allocations")]
    InvoiceVoid(Uuid),

    /// The source has nothing left to allocate.
    #[error("Source has no remaining capacity")]
    SourceExhausted,

    /// Reconciliation needs at least one target invoice.
    #[error("At least one invoice must be selected")]
    NoInvoicesSelected,

    /// Capacity or amount validation failure.
    #[error(transparent)]
    Capacity(#[from] AllocationError),

    /// Transaction aborted by a concurrent writer after retries.
    #[error("Concurrent modification detected: {0}")]
    ConcurrentModification(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl BillingError {
    /// Returns the stable error code surfaced at the boundary.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceNotFound(_)
            | Self::PaymentNotFound(_)
            | Self::CreditNoteNotFound(_)
            | Self::AllocationNotFound(_) => "NOT_FOUND",
            Self::InvoiceVoid(_) | Self::NoInvoicesSelected => "VALIDATION_ERROR",
            Self::SourceExhausted => "INSUFFICIENT_SOURCE_CAPACITY",
            Self::Capacity(err) => err.error_code(),
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
            Self::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => "STORE_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true when a caller may safely retry the same request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrentModification(_)
                | Self::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
        )
    }
}

impl RetryableError for BillingError {
    fn is_transient_conflict(&self) -> bool {
        matches!(self, Self::Database(err) if is_transient_db_conflict(err))
    }

    fn into_concurrent_modification(self) -> Self {
        match self {
            Self::Database(err) => Self::ConcurrentModification(err.to_string()),
            other => other,
        }
    }
}

/// The funding side of a settlement.
#[derive(Debug, Clone, Copy)]
pub enum SettlementSource {
    /// Allocate from a customer payment.
    Payment(Uuid),
    /// Allocate from a credit note.
    CreditNote(Uuid),
}

/// Input for settling a single invoice.
#[derive(Debug, Clone)]
pub struct SettleInvoiceInput {
    /// The invoice receiving the allocation.
    pub invoice_id: Uuid,
    /// The funding source.
    pub source: SettlementSource,
    /// The amount to allocate (must be strictly positive).
    pub amount: Decimal,
}

/// Input for reconciling one source across several invoices.
#[derive(Debug, Clone)]
pub struct ReconcileInput {
    /// The funding source.
    pub source: SettlementSource,
    /// Candidate invoices; settled ones are skipped, the rest are
    /// consumed in due-date order.
    pub invoice_ids: Vec<Uuid>,
}

/// Result of a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// Total amount allocated in this run.
    pub total_allocated: Decimal,
    /// Per-invoice allocations made, in application order.
    pub allocations: Vec<(Uuid, Decimal)>,
}

/// A locked funding source with its recomputed allocated sum.
enum LockedSource {
    Payment {
        payment: payments::Model,
        allocated_cents: i64,
    },
    CreditNote {
        note: credit_notes::Model,
        used_cents: i64,
    },
}

impl LockedSource {
    fn remaining(&self) -> i64 {
        match self {
            Self::Payment {
                payment,
                allocated_cents,
            } => remaining_cents(to_cents(payment.amount), *allocated_cents),
            Self::CreditNote { note, used_cents } => {
                remaining_cents(to_cents(note.initial_amount), *used_cents)
            }
        }
    }
}

/// Billing repository for the customer-side allocation engine.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
    max_retries: u32,
}

impl BillingRepository {
    /// Creates a new billing repository with the default retry bound.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            max_retries: DEFAULT_MAX_TXN_RETRIES,
        }
    }

    /// Creates a repository with an explicit retry bound.
    #[must_use]
    pub const fn with_max_retries(db: DatabaseConnection, max_retries: u32) -> Self {
        Self { db, max_retries }
    }

    /// Allocates an amount from a payment or credit note against an
    /// invoice, re-deriving both entities' statuses.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not strictly positive (rejected before the
    ///   transaction opens)
    /// - Either entity is missing, or the invoice is void
    /// - The amount exceeds the invoice's remaining due or the source's
    ///   remaining capacity
    /// - The transaction keeps conflicting with concurrent writers
    pub async fn settle_invoice(
        &self,
        input: SettleInvoiceInput,
    ) -> Result<invoices::Model, BillingError> {
        let amount_cents = to_cents(input.amount);
        if amount_cents <= 0 {
            return Err(AllocationError::NonPositiveAmount.into());
        }

        with_txn_retry("billing.settle_invoice", self.max_retries, || {
            self.settle_invoice_in_txn(&input, amount_cents)
        })
        .await
    }

    async fn settle_invoice_in_txn(
        &self,
        input: &SettleInvoiceInput,
        amount_cents: i64,
    ) -> Result<invoices::Model, BillingError> {
        let txn = self.db.begin().await?;

        // Lock order: invoice row first, then the source row.
        let invoice = invoices::Entity::find_by_id(input.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::InvoiceNotFound(input.invoice_id))?;

        if invoice.status == InvoiceStatus::Void {
            return Err(BillingError::InvoiceVoid(invoice.id));
        }

        let invoice_total_cents = to_cents(invoice.total);
        let invoice_allocated = allocated_to_invoice_cents(&txn, invoice.id).await?;
        let amount = from_cents(amount_cents);
        let now = Utc::now();

        match input.source {
            SettlementSource::Payment(payment_id) => {
                let payment = payments::Entity::find_by_id(payment_id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(BillingError::PaymentNotFound(payment_id))?;

                let payment_amount_cents = to_cents(payment.amount);
                let payment_allocated = allocated_from_payment_cents(&txn, payment.id).await?;

                check_allocation(&AllocationRequest {
                    amount_cents,
                    debt_total_cents: invoice_total_cents,
                    debt_allocated_cents: invoice_allocated,
                    source_amount_cents: payment_amount_cents,
                    source_allocated_cents: payment_allocated,
                })?;

                payment_allocations::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    payment_id: Set(payment.id),
                    invoice_id: Set(invoice.id),
                    amount_allocated: Set(amount),
                    created_at: Set(now.into()),
                }
                .insert(&txn)
                .await?;

                let status =
                    derive_source_status(payment_amount_cents, payment_allocated + amount_cents);
                let mut active: payments::ActiveModel = payment.into();
                active.status = Set(payment_status_from(status));
                active.update(&txn).await?;
            }
            SettlementSource::CreditNote(note_id) => {
                let note = credit_notes::Entity::find_by_id(note_id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(BillingError::CreditNoteNotFound(note_id))?;

                let initial_cents = to_cents(note.initial_amount);
                let used_cents = allocated_from_credit_note_cents(&txn, note.id).await?;

                check_allocation(&AllocationRequest {
                    amount_cents,
                    debt_total_cents: invoice_total_cents,
                    debt_allocated_cents: invoice_allocated,
                    source_amount_cents: initial_cents,
                    source_allocated_cents: used_cents,
                })?;

                credit_note_allocations::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    credit_note_id: Set(note.id),
                    invoice_id: Set(invoice.id),
                    amount_allocated: Set(amount),
                    created_at: Set(now.into()),
                }
                .insert(&txn)
                .await?;

                let remaining = remaining_cents(initial_cents, used_cents + amount_cents);
                let mut active: credit_notes::ActiveModel = note.into();
                active.remaining_amount = Set(from_cents(remaining));
                active.status = Set(credit_status_from(derive_credit_status(
                    initial_cents,
                    remaining,
                )));
                active.update(&txn).await?;
            }
        }

        let status = derive_debt_status(invoice_total_cents, invoice_allocated + amount_cents);
        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(invoice_status_from(status));
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Removes a payment allocation, re-deriving the invoice status from
    /// the surviving allocation set and the payment status from its
    /// surviving allocations.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation, invoice, or payment is missing,
    /// or the transaction keeps conflicting with concurrent writers.
    pub async fn deallocate_payment(
        &self,
        allocation_id: Uuid,
    ) -> Result<invoices::Model, BillingError> {
        with_txn_retry("billing.deallocate_payment", self.max_retries, || {
            self.deallocate_payment_in_txn(allocation_id)
        })
        .await
    }

    async fn deallocate_payment_in_txn(
        &self,
        allocation_id: Uuid,
    ) -> Result<invoices::Model, BillingError> {
        let txn = self.db.begin().await?;

        let allocation = payment_allocations::Entity::find_by_id(allocation_id)
            .one(&txn)
            .await?
            .ok_or(BillingError::AllocationNotFound(allocation_id))?;

        let invoice = invoices::Entity::find_by_id(allocation.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::InvoiceNotFound(allocation.invoice_id))?;
        let payment = payments::Entity::find_by_id(allocation.payment_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::PaymentNotFound(allocation.payment_id))?;

        payment_allocations::Entity::delete_by_id(allocation.id)
            .exec(&txn)
            .await?;

        let invoice = refresh_invoice_status(&txn, invoice).await?;

        let payment_amount_cents = to_cents(payment.amount);
        let payment_allocated = allocated_from_payment_cents(&txn, payment.id).await?;
        let mut active: payments::ActiveModel = payment.into();
        active.status = Set(payment_status_from(derive_source_status(
            payment_amount_cents,
            payment_allocated,
        )));
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(invoice)
    }

    /// Removes a credit note allocation, restoring the note's remaining
    /// amount from the recomputed allocation set.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation, invoice, or credit note is
    /// missing, or the transaction keeps conflicting with concurrent
    /// writers.
    pub async fn deallocate_credit_note(
        &self,
        allocation_id: Uuid,
    ) -> Result<invoices::Model, BillingError> {
        with_txn_retry("billing.deallocate_credit_note", self.max_retries, || {
            self.deallocate_credit_note_in_txn(allocation_id)
        })
        .await
    }

    async fn deallocate_credit_note_in_txn(
        &self,
        allocation_id: Uuid,
    ) -> Result<invoices::Model, BillingError> {
        let txn = self.db.begin().await?;

        let allocation = credit_note_allocations::Entity::find_by_id(allocation_id)
            .one(&txn)
            .await?
            .ok_or(BillingError::AllocationNotFound(allocation_id))?;

        let invoice = invoices::Entity::find_by_id(allocation.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::InvoiceNotFound(allocation.invoice_id))?;
        let note = credit_notes::Entity::find_by_id(allocation.credit_note_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::CreditNoteNotFound(allocation.credit_note_id))?;

        credit_note_allocations::Entity::delete_by_id(allocation.id)
            .exec(&txn)
            .await?;

        let invoice = refresh_invoice_status(&txn, invoice).await?;
        refresh_credit_note(&txn, note).await?;

        txn.commit().await?;
        Ok(invoice)
    }

    /// Reconciles one source across several invoices: candidates are
    /// consumed in due-date order, each receiving the lesser of the
    /// source's remaining capacity and the invoice's remaining due.
    ///
    /// # Errors
    ///
    /// Returns an error if no invoice is selected, the source is missing
    /// or exhausted, or the transaction keeps conflicting with concurrent
    /// writers.
    pub async fn reconcile(&self, input: ReconcileInput) -> Result<ReconcileOutcome, BillingError> {
        if input.invoice_ids.is_empty() {
            return Err(BillingError::NoInvoicesSelected);
        }

        with_txn_retry("billing.reconcile", self.max_retries, || {
            self.reconcile_in_txn(&input)
        })
        .await
    }

    async fn reconcile_in_txn(
        &self,
        input: &ReconcileInput,
    ) -> Result<ReconcileOutcome, BillingError> {
        let txn = self.db.begin().await?;

        // Only open invoices participate; due first gets funded first.
        let targets = invoices::Entity::find()
            .filter(invoices::Column::Id.is_in(input.invoice_ids.clone()))
            .filter(
                invoices::Column::Status
                    .is_in([InvoiceStatus::Unpaid, InvoiceStatus::PartiallyPaid]),
            )
            .order_by_asc(invoices::Column::DueDate)
            .lock_exclusive()
            .all(&txn)
            .await?;

        let source = lock_source(&txn, input.source).await?;
        if source.remaining() <= 0 {
            return Err(BillingError::SourceExhausted);
        }

        let mut debt_targets = Vec::with_capacity(targets.len());
        for invoice in &targets {
            let allocated = allocated_to_invoice_cents(&txn, invoice.id).await?;
            debt_targets.push(DebtTarget {
                debt_id: InvoiceId::from_uuid(invoice.id),
                remaining_due_cents: remaining_cents(to_cents(invoice.total), allocated),
            });
        }

        let plan = plan_reconciliation(source.remaining(), &debt_targets);
        let now = Utc::now();
        let mut applied = Vec::with_capacity(plan.len());

        for (invoice_id, cents) in &plan {
            match &source {
                LockedSource::Payment { payment, .. } => {
                    payment_allocations::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        payment_id: Set(payment.id),
                        invoice_id: Set(invoice_id.into_inner()),
                        amount_allocated: Set(from_cents(*cents)),
                        created_at: Set(now.into()),
                    }
                    .insert(&txn)
                    .await?;
                }
                LockedSource::CreditNote { note, .. } => {
                    credit_note_allocations::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        credit_note_id: Set(note.id),
                        invoice_id: Set(invoice_id.into_inner()),
                        amount_allocated: Set(from_cents(*cents)),
                        created_at: Set(now.into()),
                    }
                    .insert(&txn)
                    .await?;
                }
            }
            applied.push((invoice_id.into_inner(), from_cents(*cents)));
        }

        // Re-derive each funded invoice from the refreshed allocation set.
        for invoice in targets {
            if !plan.iter().any(|(id, _)| id.into_inner() == invoice.id) {
                continue;
            }
            refresh_invoice_status(&txn, invoice).await?;
        }

        let total_cents: i64 = plan.iter().map(|(_, cents)| cents).sum();
        match source {
            LockedSource::Payment {
                payment,
                allocated_cents,
            } => {
                let amount_cents = to_cents(payment.amount);
                let mut active: payments::ActiveModel = payment.into();
                active.status = Set(payment_status_from(derive_source_status(
                    amount_cents,
                    allocated_cents + total_cents,
                )));
                active.update(&txn).await?;
            }
            LockedSource::CreditNote { note, used_cents } => {
                let initial_cents = to_cents(note.initial_amount);
                let remaining = remaining_cents(initial_cents, used_cents + total_cents);
                let mut active: credit_notes::ActiveModel = note.into();
                active.remaining_amount = Set(from_cents(remaining));
                active.status = Set(credit_status_from(derive_credit_status(
                    initial_cents,
                    remaining,
                )));
                active.update(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(ReconcileOutcome {
            total_allocated: from_cents(total_cents),
            allocations: applied,
        })
    }

    /// Voids a customer invoice, releasing all capacity it was consuming
    /// on its funding sources. Voiding an already-void invoice is an
    /// idempotent no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing or the transaction keeps
    /// conflicting with concurrent writers.
    pub async fn void_invoice(
        &self,
        invoice_id: Uuid,
        voided_by: Uuid,
    ) -> Result<invoices::Model, BillingError> {
        with_txn_retry("billing.void_invoice", self.max_retries, || {
            self.void_invoice_in_txn(invoice_id, voided_by)
        })
        .await
    }

    async fn void_invoice_in_txn(
        &self,
        invoice_id: Uuid,
        voided_by: Uuid,
    ) -> Result<invoices::Model, BillingError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::InvoiceNotFound(invoice_id))?;

        if invoice.status == InvoiceStatus::Void {
            txn.commit().await?;
            return Ok(invoice);
        }

        let payment_allocs = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::InvoiceId.eq(invoice.id))
            .all(&txn)
            .await?;
        let note_allocs = credit_note_allocations::Entity::find()
            .filter(credit_note_allocations::Column::InvoiceId.eq(invoice.id))
            .all(&txn)
            .await?;

        let mut payment_ids: Vec<Uuid> = payment_allocs.iter().map(|a| a.payment_id).collect();
        payment_ids.sort_unstable();
        payment_ids.dedup();
        let mut note_ids: Vec<Uuid> = note_allocs.iter().map(|a| a.credit_note_id).collect();
        note_ids.sort_unstable();
        note_ids.dedup();

        payment_allocations::Entity::delete_many()
            .filter(payment_allocations::Column::InvoiceId.eq(invoice.id))
            .exec(&txn)
            .await?;
        credit_note_allocations::Entity::delete_many()
            .filter(credit_note_allocations::Column::InvoiceId.eq(invoice.id))
            .exec(&txn)
            .await?;

        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(InvoiceStatus::Void);
        active.updated_at = Set(Utc::now().into());
        let voided = active.update(&txn).await?;

        for payment_id in payment_ids {
            let payment = payments::Entity::find_by_id(payment_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(BillingError::PaymentNotFound(payment_id))?;
            let amount_cents = to_cents(payment.amount);
            let allocated = allocated_from_payment_cents(&txn, payment.id).await?;
            let mut active: payments::ActiveModel = payment.into();
            active.status = Set(payment_status_from(derive_source_status(
                amount_cents,
                allocated,
            )));
            active.update(&txn).await?;
        }

        for note_id in note_ids {
            let note = credit_notes::Entity::find_by_id(note_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(BillingError::CreditNoteNotFound(note_id))?;
            refresh_credit_note(&txn, note).await?;
        }

        tracing::info!(
            invoice_id = %voided.id,
            voided_by = %voided_by,
            "customer invoice voided"
        );

        txn.commit().await?;
        Ok(voided)
    }
}

/// Maps a derived credit status onto the credit note status enum.
const fn credit_status_from(status: CreditStatus) -> CreditNoteStatus {
    match status {
        CreditStatus::Available => CreditNoteStatus::Available,
        CreditStatus::PartiallyUsed => CreditNoteStatus::PartiallyUsed,
        CreditStatus::FullyUsed => CreditNoteStatus::FullyUsed,
    }
}

async fn lock_source(
    txn: &DatabaseTransaction,
    source: SettlementSource,
) -> Result<LockedSource, BillingError> {
    match source {
        SettlementSource::Payment(payment_id) => {
            let payment = payments::Entity::find_by_id(payment_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(BillingError::PaymentNotFound(payment_id))?;
            let allocated_cents = allocated_from_payment_cents(txn, payment.id).await?;
            Ok(LockedSource::Payment {
                payment,
                allocated_cents,
            })
        }
        SettlementSource::CreditNote(note_id) => {
            let note = credit_notes::Entity::find_by_id(note_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(BillingError::CreditNoteNotFound(note_id))?;
            let used_cents = allocated_from_credit_note_cents(txn, note.id).await?;
            Ok(LockedSource::CreditNote { note, used_cents })
        }
    }
}

/// Sums the invoice's active allocations across both allocation tables.
async fn allocated_to_invoice_cents(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<i64, DbErr> {
    let from_payments = payment_allocations::Entity::find()
        .filter(payment_allocations::Column::InvoiceId.eq(invoice_id))
        .all(txn)
        .await?;
    let from_notes = credit_note_allocations::Entity::find()
        .filter(credit_note_allocations::Column::InvoiceId.eq(invoice_id))
        .all(txn)
        .await?;

    Ok(from_payments
        .iter()
        .map(|a| to_cents(a.amount_allocated))
        .sum::<i64>()
        + from_notes
            .iter()
            .map(|a| to_cents(a.amount_allocated))
            .sum::<i64>())
}

async fn allocated_from_payment_cents(
    txn: &DatabaseTransaction,
    payment_id: Uuid,
) -> Result<i64, DbErr> {
    let allocations = payment_allocations::Entity::find()
        .filter(payment_allocations::Column::PaymentId.eq(payment_id))
        .all(txn)
        .await?;

    Ok(allocations
        .iter()
        .map(|a| to_cents(a.amount_allocated))
        .sum())
}

async fn allocated_from_credit_note_cents(
    txn: &DatabaseTransaction,
    credit_note_id: Uuid,
) -> Result<i64, DbErr> {
    let allocations = credit_note_allocations::Entity::find()
        .filter(credit_note_allocations::Column::CreditNoteId.eq(credit_note_id))
        .all(txn)
        .await?;

    Ok(allocations
        .iter()
        .map(|a| to_cents(a.amount_allocated))
        .sum())
}

/// Re-derives an invoice's status from its surviving allocation set.
/// A void invoice is returned untouched.
async fn refresh_invoice_status(
    txn: &DatabaseTransaction,
    invoice: invoices::Model,
) -> Result<invoices::Model, BillingError> {
    if invoice.status == InvoiceStatus::Void {
        return Ok(invoice);
    }

    let total_cents = to_cents(invoice.total);
    let allocated = allocated_to_invoice_cents(txn, invoice.id).await?;
    let mut active: invoices::ActiveModel = invoice.into();
    active.status = Set(invoice_status_from(derive_debt_status(
        total_cents,
        allocated,
    )));
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(txn).await?)
}

/// Rewrites a credit note's remaining amount and status from its
/// surviving allocation set.
async fn refresh_credit_note(
    txn: &DatabaseTransaction,
    note: credit_notes::Model,
) -> Result<credit_notes::Model, BillingError> {
    let initial_cents = to_cents(note.initial_amount);
    let used_cents = allocated_from_credit_note_cents(txn, note.id).await?;
    let remaining = remaining_cents(initial_cents, used_cents);

    let mut active: credit_notes::ActiveModel = note.into();
    active.remaining_amount = Set(from_cents(remaining));
    active.status = Set(credit_status_from(derive_credit_status(
        initial_cents,
        remaining,
    )));
    Ok(active.update(txn).await?)
}
