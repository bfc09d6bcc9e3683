//! Shared domain types.

pub mod id;
pub mod money;

pub use id::{
    AllocationId, CashMovementId, CashRegisterId, CashSessionId, CreditNoteId, InvoiceId,
    InvoiceLineId, PaymentId, UserId,
};
pub use money::{approx_eq, approx_zero, from_cents, to_cents};
