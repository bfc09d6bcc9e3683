//! `SeaORM` entity definitions for the ledger tables.

pub mod cash_movements;
pub mod cash_register_sessions;
pub mod cash_registers;
pub mod credit_note_allocations;
pub mod credit_notes;
pub mod inventory;
pub mod inventory_movements;
pub mod invoices;
pub mod payment_allocations;
pub mod payments;
pub mod refunds;
pub mod sea_orm_active_enums;
pub mod supplier_invoice_lines;
pub mod supplier_invoices;
pub mod supplier_payment_allocations;
pub mod supplier_payments;
pub mod users;
