//! `SeaORM` active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement status of a customer or supplier invoice.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    /// Invoice captured but not yet issued.
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Issued, nothing allocated.
    #[sea_orm(string_value = "UNPAID")]
    Unpaid,
    /// Allocations cover part of the total.
    #[sea_orm(string_value = "PARTIALLY_PAID")]
    PartiallyPaid,
    /// Allocations cover the full total.
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Cancelled; terminal.
    #[sea_orm(string_value = "VOID")]
    Void,
}

/// Allocation status of a payment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    /// Nothing allocated from this payment yet.
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    /// Part of the amount is allocated.
    #[sea_orm(string_value = "PARTIALLY_ALLOCATED")]
    PartiallyAllocated,
    /// The full amount is allocated.
    #[sea_orm(string_value = "FULLY_ALLOCATED")]
    FullyAllocated,
}

/// Usage status of a credit note.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "credit_note_status")]
pub enum CreditNoteStatus {
    /// The full initial amount remains available.
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    /// Part of the initial amount has been used.
    #[sea_orm(string_value = "PARTIALLY_USED")]
    PartiallyUsed,
    /// Nothing remains to allocate.
    #[sea_orm(string_value = "FULLY_USED")]
    FullyUsed,
}

/// Payment method.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    /// Cash through a register session.
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// Card terminal.
    #[sea_orm(string_value = "CARD")]
    Card,
    /// Bank transfer.
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
    /// Cheque.
    #[sea_orm(string_value = "CHEQUE")]
    Cheque,
}

/// Functional type of a cash register.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_register_type")]
pub enum CashRegisterType {
    /// Front-of-house sales register.
    #[sea_orm(string_value = "SALES")]
    Sales,
    /// Expense/petty-cash register.
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

/// Lifecycle status of a cash register session.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_session_status")]
pub enum CashSessionStatus {
    /// Session accepting movements.
    #[sea_orm(string_value = "OPEN")]
    Open,
    /// Session reconciled and closed; terminal.
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

/// Kind of a cash movement.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_movement_type")]
pub enum CashMovementType {
    /// Cash added to the drawer.
    #[sea_orm(string_value = "PAY_IN")]
    PayIn,
    /// Cash taken from the drawer for an expense.
    #[sea_orm(string_value = "PAY_OUT")]
    PayOut,
    /// Cash removed from the drawer.
    #[sea_orm(string_value = "WITHDRAWAL")]
    Withdrawal,
    /// Incoming transfer leg.
    #[sea_orm(string_value = "TRANSFER_IN")]
    TransferIn,
    /// Outgoing transfer leg.
    #[sea_orm(string_value = "TRANSFER_OUT")]
    TransferOut,
}

/// Kind of an inventory movement.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "inventory_movement_type")]
pub enum InventoryMovementType {
    /// Goods received against a supplier invoice.
    #[sea_orm(string_value = "PURCHASE")]
    Purchase,
    /// Goods sold.
    #[sea_orm(string_value = "SALE")]
    Sale,
    /// Manual stock adjustment.
    #[sea_orm(string_value = "ADJUSTMENT")]
    Adjustment,
}

/// User roles.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Unrestricted administrator.
    #[sea_orm(string_value = "SUPER_ADMIN")]
    SuperAdmin,
    /// Administrator.
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Store or back-office manager.
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    /// Accountant.
    #[sea_orm(string_value = "ACCOUNTANT")]
    Accountant,
    /// Point-of-sale cashier.
    #[sea_orm(string_value = "CASHIER")]
    Cashier,
}
