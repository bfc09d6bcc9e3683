//! Purchasing repository for the supplier-side allocation engine.
//!
//! Implements supplier invoice settlement and deallocation, the void
//! workflow gated on goods receipts, and goods receipt itself (line
//! accumulation, stock level upsert, immutable stock movement).

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use comptoir_core::allocation::{
    AllocationError, AllocationRequest, check_allocation, derive_debt_status, derive_source_status,
};
use comptoir_core::receipt::{ReceiptError, check_receipt};
use comptoir_shared::types::money::{from_cents, to_cents};

use crate::entities::{
    inventory, inventory_movements,
    sea_orm_active_enums::{InventoryMovementType, InvoiceStatus},
    supplier_invoice_lines, supplier_invoices, supplier_payment_allocations, supplier_payments,
};

use super::{
    DEFAULT_MAX_TXN_RETRIES, RetryableError, invoice_status_from, is_transient_db_conflict,
    payment_status_from, with_txn_retry,
};

/// Error types for purchasing operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchasingError {
    /// Supplier invoice not found.
    #[error("Supplier invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Supplier payment not found.
    #[error("Supplier payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Allocation not found.
    #[error("Allocation not found: {0}")]
    AllocationNotFound(Uuid),

    /// Supplier invoice line not found.
    #[error("Supplier invoice line not found: {0}")]
    LineNotFound(Uuid),

    /// Void invoices cannot receive allocations.
    #[error("Supplier invoice {0} is void and cannot receive allocations")]
    InvoiceVoid(Uuid),

    /// Goods already received block the void; the stock receipt must be
    /// reversed first.
    #[error("Supplier invoice {0} has received goods and cannot be voided")]
    VoidBlockedByReceipt(Uuid),

    /// Capacity or amount validation failure.
    #[error(transparent)]
    Capacity(#[from] AllocationError),

    /// Receipt quantity validation failure.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Transaction aborted by a concurrent writer after retries.
    #[error("Concurrent modification detected: {0}")]
    ConcurrentModification(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PurchasingError {
    /// Returns the stable error code surfaced at the boundary.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceNotFound(_)
            | Self::PaymentNotFound(_)
            | Self::AllocationNotFound(_)
            | Self::LineNotFound(_) => "NOT_FOUND",
            Self::InvoiceVoid(_) => "VALIDATION_ERROR",
            Self::VoidBlockedByReceipt(_) => "VOID_BLOCKED_BY_RECEIPT",
            Self::Capacity(err) => err.error_code(),
            Self::Receipt(err) => err.error_code(),
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

impl RetryableError for PurchasingError {
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

/// Input for settling a supplier invoice from a supplier payment.
#[derive(Debug, Clone)]
pub struct SettleSupplierInvoiceInput {
    /// The supplier invoice receiving the allocation.
    pub invoice_id: Uuid,
    /// The supplier payment funding it.
    pub payment_id: Uuid,
    /// The amount to allocate (must be strictly positive).
    pub amount: Decimal,
}

/// Input for receiving goods against a supplier invoice line.
#[derive(Debug, Clone)]
pub struct ReceiveGoodsInput {
    /// The invoice line being received.
    pub line_id: Uuid,
    /// Quantity to receive (must be strictly positive).
    pub quantity: Decimal,
    /// Stock location used when the variant has no stock level yet.
    pub location: Option<String>,
}

/// Purchasing repository for the supplier-side allocation engine.
#[derive(Debug, Clone)]
pub struct PurchasingRepository {
    db: DatabaseConnection,
    max_retries: u32,
}

impl PurchasingRepository {
    /// Creates a new purchasing repository with the default retry bound.
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

    /// Allocates an amount from a supplier payment against a supplier
    /// invoice, re-deriving both statuses.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not strictly positive (rejected before the
    ///   transaction opens)
    /// - Either entity is missing, or the invoice is void
    /// - The amount exceeds the invoice's remaining due or the payment's
    ///   remaining capacity
    /// - The transaction keeps conflicting with concurrent writers
    pub async fn settle_invoice(
        &self,
        input: SettleSupplierInvoiceInput,
    ) -> Result<supplier_invoices::Model, PurchasingError> {
        let amount_cents = to_cents(input.amount);
        if amount_cents <= 0 {
            return Err(AllocationError::NonPositiveAmount.into());
        }

        with_txn_retry("purchasing.settle_invoice", self.max_retries, || {
            self.settle_invoice_in_txn(&input, amount_cents)
        })
        .await
    }

    async fn settle_invoice_in_txn(
        &self,
        input: &SettleSupplierInvoiceInput,
        amount_cents: i64,
    ) -> Result<supplier_invoices::Model, PurchasingError> {
        let txn = self.db.begin().await?;

        // Lock order: invoice row first, then the payment row.
        let invoice = supplier_invoices::Entity::find_by_id(input.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PurchasingError::InvoiceNotFound(input.invoice_id))?;

        if invoice.status == InvoiceStatus::Void {
            return Err(PurchasingError::InvoiceVoid(invoice.id));
        }

        let payment = supplier_payments::Entity::find_by_id(input.payment_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PurchasingError::PaymentNotFound(input.payment_id))?;

        let invoice_total_cents = to_cents(invoice.total);
        let invoice_allocated = allocated_to_invoice_cents(&txn, invoice.id).await?;
        let payment_amount_cents = to_cents(payment.amount);
        let payment_allocated = allocated_from_payment_cents(&txn, payment.id).await?;

        check_allocation(&AllocationRequest {
            amount_cents,
            debt_total_cents: invoice_total_cents,
            debt_allocated_cents: invoice_allocated,
            source_amount_cents: payment_amount_cents,
            source_allocated_cents: payment_allocated,
        })?;

        let now = Utc::now();
        supplier_payment_allocations::ActiveModel {
            id: Set(Uuid::new_v4()),
            payment_id: Set(payment.id),
            invoice_id: Set(invoice.id),
            amount_allocated: Set(from_cents(amount_cents)),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let mut active: supplier_payments::ActiveModel = payment.into();
        active.status = Set(payment_status_from(derive_source_status(
            payment_amount_cents,
            payment_allocated + amount_cents,
        )));
        active.update(&txn).await?;

        let status = derive_debt_status(invoice_total_cents, invoice_allocated + amount_cents);
        let mut active: supplier_invoices::ActiveModel = invoice.into();
        active.status = Set(invoice_status_from(status));
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Removes a supplier payment allocation, re-deriving the invoice and
    /// payment statuses from the surviving allocation sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation, invoice, or payment is missing,
    /// or the transaction keeps conflicting with concurrent writers.
    pub async fn deallocate(
        &self,
        allocation_id: Uuid,
    ) -> Result<supplier_invoices::Model, PurchasingError> {
        with_txn_retry("purchasing.deallocate", self.max_retries, || {
            self.deallocate_in_txn(allocation_id)
        })
        .await
    }

    async fn deallocate_in_txn(
        &self,
        allocation_id: Uuid,
    ) -> Result<supplier_invoices::Model, PurchasingError> {
        let txn = self.db.begin().await?;

        let allocation = supplier_payment_allocations::Entity::find_by_id(allocation_id)
            .one(&txn)
            .await?
            .ok_or(PurchasingError::AllocationNotFound(allocation_id))?;

        let invoice = supplier_invoices::Entity::find_by_id(allocation.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PurchasingError::InvoiceNotFound(allocation.invoice_id))?;
        let payment = supplier_payments::Entity::find_by_id(allocation.payment_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PurchasingError::PaymentNotFound(allocation.payment_id))?;

        supplier_payment_allocations::Entity::delete_by_id(allocation.id)
            .exec(&txn)
            .await?;

        let invoice = refresh_invoice_status(&txn, invoice).await?;

        let payment_amount_cents = to_cents(payment.amount);
        let payment_allocated = allocated_from_payment_cents(&txn, payment.id).await?;
        let mut active: supplier_payments::ActiveModel = payment.into();
        active.status = Set(payment_status_from(derive_source_status(
            payment_amount_cents,
            payment_allocated,
        )));
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(invoice)
    }

    /// Voids a supplier invoice. Fails when any line has received goods;
    /// otherwise deletes all of the invoice's allocations, marks it void,
    /// and re-derives every touched payment's status from its surviving
    /// allocations. Voiding an already-void invoice is an idempotent
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing, goods were already
    /// received against it, or the transaction keeps conflicting with
    /// concurrent writers.
    pub async fn void_invoice(
        &self,
        invoice_id: Uuid,
        voided_by: Uuid,
    ) -> Result<supplier_invoices::Model, PurchasingError> {
        with_txn_retry("purchasing.void_invoice", self.max_retries, || {
            self.void_invoice_in_txn(invoice_id, voided_by)
        })
        .await
    }

    async fn void_invoice_in_txn(
        &self,
        invoice_id: Uuid,
        voided_by: Uuid,
    ) -> Result<supplier_invoices::Model, PurchasingError> {
        let txn = self.db.begin().await?;

        let invoice = supplier_invoices::Entity::find_by_id(invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PurchasingError::InvoiceNotFound(invoice_id))?;

        if invoice.status == InvoiceStatus::Void {
            txn.commit().await?;
            return Ok(invoice);
        }

        // Goods already received cannot be silently un-debited; the stock
        // receipt must be reversed before the invoice can go away.
        let lines = supplier_invoice_lines::Entity::find()
            .filter(supplier_invoice_lines::Column::InvoiceId.eq(invoice.id))
            .all(&txn)
            .await?;
        if lines.iter().any(|line| line.received_quantity > Decimal::ZERO) {
            return Err(PurchasingError::VoidBlockedByReceipt(invoice.id));
        }

        let allocations = supplier_payment_allocations::Entity::find()
            .filter(supplier_payment_allocations::Column::InvoiceId.eq(invoice.id))
            .all(&txn)
            .await?;
        let mut payment_ids: Vec<Uuid> = allocations.iter().map(|a| a.payment_id).collect();
        payment_ids.sort_unstable();
        payment_ids.dedup();

        supplier_payment_allocations::Entity::delete_many()
            .filter(supplier_payment_allocations::Column::InvoiceId.eq(invoice.id))
            .exec(&txn)
            .await?;

        let mut active: supplier_invoices::ActiveModel = invoice.into();
        active.status = Set(InvoiceStatus::Void);
        active.updated_at = Set(Utc::now().into());
        let voided = active.update(&txn).await?;

        // A voided invoice must release all capacity it was consuming on
        // its funding sources.
        for payment_id in payment_ids {
            let payment = supplier_payments::Entity::find_by_id(payment_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(PurchasingError::PaymentNotFound(payment_id))?;
            let amount_cents = to_cents(payment.amount);
            let allocated = allocated_from_payment_cents(&txn, payment.id).await?;
            let mut active: supplier_payments::ActiveModel = payment.into();
            active.status = Set(payment_status_from(derive_source_status(
                amount_cents,
                allocated,
            )));
            active.update(&txn).await?;
        }

        tracing::info!(
            invoice_id = %voided.id,
            voided_by = %voided_by,
            "supplier invoice voided"
        );

        txn.commit().await?;
        Ok(voided)
    }

    /// Records a goods receipt against a supplier invoice line:
    /// accumulates the line's received quantity, upserts the stock level
    /// for the line's product variant, and appends an immutable stock
    /// movement.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The quantity is not strictly positive (rejected before the
    ///   transaction opens)
    /// - The line is missing
    /// - The receipt would exceed the ordered quantity
    /// - The transaction keeps conflicting with concurrent writers
    pub async fn receive_goods(
        &self,
        input: ReceiveGoodsInput,
    ) -> Result<supplier_invoice_lines::Model, PurchasingError> {
        if input.quantity <= Decimal::ZERO {
            return Err(ReceiptError::NonPositiveQuantity.into());
        }

        with_txn_retry("purchasing.receive_goods", self.max_retries, || {
            self.receive_goods_in_txn(&input)
        })
        .await
    }

    async fn receive_goods_in_txn(
        &self,
        input: &ReceiveGoodsInput,
    ) -> Result<supplier_invoice_lines::Model, PurchasingError> {
        let txn = self.db.begin().await?;

        let line = supplier_invoice_lines::Entity::find_by_id(input.line_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PurchasingError::LineNotFound(input.line_id))?;

        check_receipt(line.quantity, line.received_quantity, input.quantity)?;

        let invoice = supplier_invoices::Entity::find_by_id(line.invoice_id)
            .one(&txn)
            .await?
            .ok_or(PurchasingError::InvoiceNotFound(line.invoice_id))?;

        let product_variant_id = line.product_variant_id;
        let new_received = line.received_quantity + input.quantity;
        let mut active: supplier_invoice_lines::ActiveModel = line.into();
        active.received_quantity = Set(new_received);
        let updated_line = active.update(&txn).await?;

        let now = Utc::now();
        let stock = inventory::Entity::find()
            .filter(inventory::Column::ProductVariantId.eq(product_variant_id))
            .lock_exclusive()
            .one(&txn)
            .await?;

        let stock = match stock {
            Some(stock) => {
                let new_quantity = stock.quantity + input.quantity;
                let mut active: inventory::ActiveModel = stock.into();
                active.quantity = Set(new_quantity);
                active.update(&txn).await?
            }
            None => {
                inventory::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    product_variant_id: Set(product_variant_id),
                    quantity: Set(input.quantity),
                    location: Set(input
                        .location
                        .clone()
                        .unwrap_or_else(|| "Default".to_string())),
                }
                .insert(&txn)
                .await?
            }
        };

        let reference = invoice
            .invoice_number
            .unwrap_or_else(|| invoice.id.to_string()[..8].to_string());
        inventory_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            inventory_id: Set(stock.id),
            quantity: Set(input.quantity),
            movement_type: Set(InventoryMovementType::Purchase),
            reason: Set(format!("Goods receipt for supplier invoice #{reference}")),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(updated_line)
    }
}

async fn allocated_to_invoice_cents(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<i64, DbErr> {
    let allocations = supplier_payment_allocations::Entity::find()
        .filter(supplier_payment_allocations::Column::InvoiceId.eq(invoice_id))
        .all(txn)
        .await?;

    Ok(allocations
        .iter()
        .map(|a| to_cents(a.amount_allocated))
        .sum())
}

async fn allocated_from_payment_cents(
    txn: &DatabaseTransaction,
    payment_id: Uuid,
) -> Result<i64, DbErr> {
    let allocations = supplier_payment_allocations::Entity::find()
        .filter(supplier_payment_allocations::Column::PaymentId.eq(payment_id))
        .all(txn)
        .await?;

    Ok(allocations
        .iter()
        .map(|a| to_cents(a.amount_allocated))
        .sum())
}

/// Re-derives a supplier invoice's status from its surviving allocation
/// set. A void invoice is returned untouched.
async fn refresh_invoice_status(
    txn: &DatabaseTransaction,
    invoice: supplier_invoices::Model,
) -> Result<supplier_invoices::Model, PurchasingError> {
    if invoice.status == InvoiceStatus::Void {
        return Ok(invoice);
    }

    let total_cents = to_cents(invoice.total);
    let allocated = allocated_to_invoice_cents(txn, invoice.id).await?;
    let mut active: supplier_invoices::ActiveModel = invoice.into();
    active.status = Set(invoice_status_from(derive_debt_status(
        total_cents,
        allocated,
    )));
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(txn).await?)
}
