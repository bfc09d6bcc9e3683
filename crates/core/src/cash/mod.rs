//! Cash register session arithmetic.
//!
//! This module implements the pure half of the cash session ledger:
//! - Movement kinds and signed amount derivation
//! - Opening balance validation and session close arithmetic
//! - Transfer preconditions that need no database state
//!
//! The running balance of a session is never stored; it is always the
//! opening balance plus the sum of the session's signed movement rows.

pub mod error;
pub mod movement;
pub mod session;

#[cfg(test)]
mod props;

pub use error::CashError;
pub use movement::{MovementKind, signed_amount};
pub use session::{CloseInput, CloseOutcome, check_opening_balance, check_transfer, compute_close};
