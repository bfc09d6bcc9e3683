//! Cash session repository for the register session ledger.
//!
//! Implements the session lifecycle (open, close), movement recording,
//! and inter-register transfers as a paired double movement. A session's
//! running balance is never stored; close recomputes every sum from the
//! session's rows inside the closing transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use comptoir_core::cash::{
    CashError, CloseInput, MovementKind, check_opening_balance, check_transfer, compute_close,
    signed_amount,
};
use comptoir_shared::types::CashRegisterId;

use crate::entities::{
    cash_movements, cash_register_sessions, cash_registers, payments, refunds,
    sea_orm_active_enums::{CashMovementType, CashSessionStatus, PaymentMethod},
};

use super::{DEFAULT_MAX_TXN_RETRIES, RetryableError, is_transient_db_conflict, with_txn_retry};

/// Error types for cash session operations.
#[derive(Debug, thiserror::Error)]
pub enum CashSessionError {
    /// Cash register not found.
    #[error("Cash register not found: {0}")]
    RegisterNotFound(Uuid),

    /// Session not found.
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// The register already has an open session.
    #[error("Register {0} already has an open session")]
    SessionAlreadyOpen(Uuid),

    /// The target session is not open.
    #[error("Session {0} is not open")]
    SessionNotOpen(Uuid),

    /// The destination register has no open session to receive funds.
    #[error("Register {0} has no active session to receive funds")]
    NoActiveDestinationSession(Uuid),

    /// Input validation failure.
    #[error(transparent)]
    Validation(#[from] CashError),

    /// Transaction aborted by a concurrent writer after retries.
    #[error("Concurrent modification detected: {0}")]
    ConcurrentModification(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl CashSessionError {
    /// Returns the stable error code surfaced at the boundary.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RegisterNotFound(_) | Self::SessionNotFound(_) => "NOT_FOUND",
            Self::SessionAlreadyOpen(_) => "SESSION_ALREADY_OPEN",
            Self::SessionNotOpen(_) => "SESSION_NOT_OPEN",
            Self::NoActiveDestinationSession(_) => "NO_ACTIVE_DESTINATION_SESSION",
            Self::Validation(err) => err.error_code(),
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

impl RetryableError for CashSessionError {
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

/// Input for opening a register session.
#[derive(Debug, Clone)]
pub struct OpenSessionInput {
    /// The register to open a session on.
    pub cash_register_id: Uuid,
    /// The counted float placed in the drawer (must not be negative).
    pub opening_balance: Decimal,
    /// The user opening the session.
    pub opened_by: Uuid,
}

/// Input for recording a cash movement.
#[derive(Debug, Clone)]
pub struct RecordMovementInput {
    /// The open session receiving the movement.
    pub session_id: Uuid,
    /// The positive input amount; the stored amount is signed by kind.
    pub amount: Decimal,
    /// The movement kind.
    pub kind: MovementKind,
    /// The reason recorded for the audit trail.
    pub reason: String,
    /// The user recording the movement.
    pub user_id: Uuid,
}

/// Input for closing a register session.
#[derive(Debug, Clone)]
pub struct CloseSessionInput {
    /// The open session to close.
    pub session_id: Uuid,
    /// The counted drawer amount (must not be negative).
    pub closing_balance: Decimal,
    /// The user closing the session.
    pub closed_by: Uuid,
}

/// Input for transferring funds between registers.
#[derive(Debug, Clone)]
pub struct TransferFundsInput {
    /// The open session funds leave from.
    pub source_session_id: Uuid,
    /// The register whose open session receives the funds.
    pub destination_register_id: Uuid,
    /// The positive amount to transfer.
    pub amount: Decimal,
    /// The reason recorded on both legs.
    pub reason: String,
    /// The user performing the transfer.
    pub user_id: Uuid,
}

/// The two movement legs created by a transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The TRANSFER_OUT leg on the source session.
    pub outgoing: cash_movements::Model,
    /// The TRANSFER_IN leg on the destination session.
    pub incoming: cash_movements::Model,
}

/// Cash session repository for the register session ledger.
#[derive(Debug, Clone)]
pub struct CashSessionRepository {
    db: DatabaseConnection,
    max_retries: u32,
}

impl CashSessionRepository {
    /// Creates a new cash session repository with the default retry bound.
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

    /// Opens a session on a register. The register row is locked for the
    /// check-then-insert so two concurrent opens cannot both succeed; a
    /// partial unique index backs the invariant at the store level.
    ///
    /// # Errors
    ///
    /// Returns an error if the opening balance is negative (rejected
    /// before the transaction opens), the register is missing, it already
    /// has an open session, or the transaction keeps conflicting with
    /// concurrent writers.
    pub async fn open_session(
        &self,
        input: OpenSessionInput,
    ) -> Result<cash_register_sessions::Model, CashSessionError> {
        check_opening_balance(input.opening_balance)?;

        with_txn_retry("cash.open_session", self.max_retries, || {
            self.open_session_in_txn(&input)
        })
        .await
    }

    async fn open_session_in_txn(
        &self,
        input: &OpenSessionInput,
    ) -> Result<cash_register_sessions::Model, CashSessionError> {
        let txn = self.db.begin().await?;

        let register = cash_registers::Entity::find_by_id(input.cash_register_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashSessionError::RegisterNotFound(input.cash_register_id))?;

        let existing = cash_register_sessions::Entity::find()
            .filter(cash_register_sessions::Column::CashRegisterId.eq(register.id))
            .filter(cash_register_sessions::Column::Status.eq(CashSessionStatus::Open))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(CashSessionError::SessionAlreadyOpen(register.id));
        }

        let now = Utc::now();
        let session = cash_register_sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            cash_register_id: Set(register.id),
            status: Set(CashSessionStatus::Open),
            opening_balance: Set(input.opening_balance),
            closing_balance: Set(None),
            expected_balance: Set(None),
            difference: Set(None),
            opened_by_user_id: Set(input.opened_by),
            closed_by_user_id: Set(None),
            opened_at: Set(now.into()),
            closed_at: Set(None),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(session)
    }

    /// Records a cash movement in an open session. The stored amount is
    /// signed by kind; the ledger does not prevent a negative running
    /// balance, it only records facts.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount or reason is invalid (rejected
    /// before the transaction opens), the session is missing or not open,
    /// or the transaction keeps conflicting with concurrent writers.
    pub async fn record_movement(
        &self,
        input: RecordMovementInput,
    ) -> Result<cash_movements::Model, CashSessionError> {
        let signed = signed_amount(input.kind, input.amount)?;
        if input.reason.trim().is_empty() {
            return Err(CashError::MissingReason.into());
        }

        with_txn_retry("cash.record_movement", self.max_retries, || {
            self.record_movement_in_txn(&input, signed)
        })
        .await
    }

    async fn record_movement_in_txn(
        &self,
        input: &RecordMovementInput,
        signed: Decimal,
    ) -> Result<cash_movements::Model, CashSessionError> {
        let txn = self.db.begin().await?;

        let session = cash_register_sessions::Entity::find_by_id(input.session_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashSessionError::SessionNotFound(input.session_id))?;
        if session.status != CashSessionStatus::Open {
            return Err(CashSessionError::SessionNotOpen(session.id));
        }

        let movement = cash_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session.id),
            user_id: Set(input.user_id),
            amount: Set(signed),
            movement_type: Set(movement_type_from(input.kind)),
            reason: Set(input.reason.clone()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(movement)
    }

    /// Closes an open session: recomputes the expected balance from the
    /// session's movements, cash sales, and cash refunds, stores the
    /// counted balance and the difference, and stamps who closed it.
    /// Closed is terminal; there is no reopen path.
    ///
    /// # Errors
    ///
    /// Returns an error if the closing balance is negative (rejected
    /// before the transaction opens), the session is missing or already
    /// closed, or the transaction keeps conflicting with concurrent
    /// writers.
    pub async fn close_session(
        &self,
        input: CloseSessionInput,
    ) -> Result<cash_register_sessions::Model, CashSessionError> {
        if input.closing_balance < Decimal::ZERO {
            return Err(CashError::NegativeClosingBalance.into());
        }

        with_txn_retry("cash.close_session", self.max_retries, || {
            self.close_session_in_txn(&input)
        })
        .await
    }

    async fn close_session_in_txn(
        &self,
        input: &CloseSessionInput,
    ) -> Result<cash_register_sessions::Model, CashSessionError> {
        let txn = self.db.begin().await?;

        let session = cash_register_sessions::Entity::find_by_id(input.session_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashSessionError::SessionNotFound(input.session_id))?;
        if session.status != CashSessionStatus::Open {
            return Err(CashSessionError::SessionNotOpen(session.id));
        }

        let movements_total = sum_session_movements(&txn, session.id).await?;
        let cash_sales_total = sum_session_cash_payments(&txn, session.id).await?;
        let cash_refunds_total = sum_session_cash_refunds(&txn, session.id).await?;

        let outcome = compute_close(&CloseInput {
            opening_balance: session.opening_balance,
            movements_total,
            cash_sales_total,
            cash_refunds_total,
            counted_balance: input.closing_balance,
        });

        let mut active: cash_register_sessions::ActiveModel = session.into();
        active.status = Set(CashSessionStatus::Closed);
        active.closing_balance = Set(Some(input.closing_balance));
        active.expected_balance = Set(Some(outcome.expected_balance));
        active.difference = Set(Some(outcome.difference));
        active.closed_by_user_id = Set(Some(input.closed_by));
        active.closed_at = Set(Some(Utc::now().into()));
        let closed = active.update(&txn).await?;

        txn.commit().await?;
        Ok(closed)
    }

    /// Transfers funds between registers as exactly two movements created
    /// atomically: a TRANSFER_OUT on the source session and a TRANSFER_IN
    /// on the destination register's open session — never one without the
    /// other.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount or reason is invalid (rejected
    /// before the transaction opens), the source session is missing or
    /// not open, the destination register has no open session, both
    /// registers are the same, or the transaction keeps conflicting with
    /// concurrent writers.
    pub async fn transfer_funds(
        &self,
        input: TransferFundsInput,
    ) -> Result<TransferOutcome, CashSessionError> {
        if input.amount <= Decimal::ZERO {
            return Err(CashError::NonPositiveAmount.into());
        }
        if input.reason.trim().is_empty() {
            return Err(CashError::MissingReason.into());
        }

        with_txn_retry("cash.transfer_funds", self.max_retries, || {
            self.transfer_funds_in_txn(&input)
        })
        .await
    }

    async fn transfer_funds_in_txn(
        &self,
        input: &TransferFundsInput,
    ) -> Result<TransferOutcome, CashSessionError> {
        let txn = self.db.begin().await?;

        // Lock order: source session first, then the destination session.
        let source = cash_register_sessions::Entity::find_by_id(input.source_session_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashSessionError::SessionNotFound(input.source_session_id))?;
        if source.status != CashSessionStatus::Open {
            return Err(CashSessionError::SessionNotOpen(source.id));
        }

        let destination = cash_register_sessions::Entity::find()
            .filter(
                cash_register_sessions::Column::CashRegisterId.eq(input.destination_register_id),
            )
            .filter(cash_register_sessions::Column::Status.eq(CashSessionStatus::Open))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashSessionError::NoActiveDestinationSession(
                input.destination_register_id,
            ))?;

        check_transfer(
            CashRegisterId::from_uuid(source.cash_register_id),
            CashRegisterId::from_uuid(destination.cash_register_id),
            input.amount,
            &input.reason,
        )?;

        let now = Utc::now();
        let source_register = source.cash_register_id.to_string();
        let destination_register = destination.cash_register_id.to_string();

        let outgoing = cash_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(source.id),
            user_id: Set(input.user_id),
            amount: Set(-input.amount),
            movement_type: Set(CashMovementType::TransferOut),
            reason: Set(format!(
                "{} (to register {})",
                input.reason,
                &destination_register[..8]
            )),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let incoming = cash_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(destination.id),
            user_id: Set(input.user_id),
            amount: Set(input.amount),
            movement_type: Set(CashMovementType::TransferIn),
            reason: Set(format!(
                "{} (from register {})",
                input.reason,
                &source_register[..8]
            )),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        tracing::info!(
            source_session = %source.id,
            destination_session = %destination.id,
            amount = %input.amount,
            user_id = %input.user_id,
            "funds transferred between registers"
        );

        txn.commit().await?;
        Ok(TransferOutcome { outgoing, incoming })
    }
}

/// Maps a core movement kind onto the stored enum.
const fn movement_type_from(kind: MovementKind) -> CashMovementType {
    match kind {
        MovementKind::PayIn => CashMovementType::PayIn,
        MovementKind::PayOut => CashMovementType::PayOut,
        MovementKind::Withdrawal => CashMovementType::Withdrawal,
        MovementKind::TransferIn => CashMovementType::TransferIn,
        MovementKind::TransferOut => CashMovementType::TransferOut,
    }
}

async fn sum_session_movements(
    txn: &DatabaseTransaction,
    session_id: Uuid,
) -> Result<Decimal, DbErr> {
    let movements = cash_movements::Entity::find()
        .filter(cash_movements::Column::SessionId.eq(session_id))
        .all(txn)
        .await?;

    Ok(movements.iter().map(|m| m.amount).sum())
}

async fn sum_session_cash_payments(
    txn: &DatabaseTransaction,
    session_id: Uuid,
) -> Result<Decimal, DbErr> {
    let cash_payments = payments::Entity::find()
        .filter(payments::Column::CashRegisterSessionId.eq(session_id))
        .filter(payments::Column::Method.eq(PaymentMethod::Cash))
        .all(txn)
        .await?;

    Ok(cash_payments.iter().map(|p| p.amount).sum())
}

async fn sum_session_cash_refunds(
    txn: &DatabaseTransaction,
    session_id: Uuid,
) -> Result<Decimal, DbErr> {
    let cash_refunds = refunds::Entity::find()
        .filter(refunds::Column::CashRegisterSessionId.eq(session_id))
        .filter(refunds::Column::Method.eq(PaymentMethod::Cash))
        .all(txn)
        .await?;

    Ok(cash_refunds.iter().map(|r| r.amount).sum())
}
