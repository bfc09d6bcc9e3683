//! Role/action authorization table for the ledger operations.
//!
//! The boundary layer evaluates every request against this single table
//! before calling into a repository; the repositories themselves never
//! check roles. Keeping the matrix in one place is what lets the ledger
//! core stay policy-free.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User roles known to the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Unrestricted administrator.
    SuperAdmin,
    /// Administrator.
    Admin,
    /// Store or back-office manager.
    Manager,
    /// Accountant.
    Accountant,
    /// Point-of-sale cashier.
    Cashier,
}

/// Ledger actions subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAction {
    /// Allocate a payment or credit note against an invoice.
    Settle,
    /// Remove an existing allocation.
    Deallocate,
    /// Void an invoice.
    VoidInvoice,
    /// Record a goods receipt against a supplier invoice line.
    ReceiveGoods,
    /// Open a cash register session.
    OpenSession,
    /// Close a cash register session.
    CloseSession,
    /// Record a cash movement in a session.
    RecordMovement,
    /// Transfer funds between registers.
    TransferFunds,
}

/// Access denied by the policy table.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Role {role:?} is not allowed to perform {action:?}")]
pub struct PolicyError {
    /// The role that was denied.
    pub role: Role,
    /// The action that was requested.
    pub action: LedgerAction,
}

/// Returns true when `role` may perform `action`.
#[must_use]
pub const fn is_allowed(role: Role, action: LedgerAction) -> bool {
    use LedgerAction as A;
    use Role as R;

    match role {
        R::SuperAdmin | R::Admin => true,
        R::Manager => !matches!(action, A::Deallocate),
        R::Accountant => matches!(
            action,
            A::Settle | A::Deallocate | A::VoidInvoice | A::CloseSession
        ),
        R::Cashier => matches!(
            action,
            A::OpenSession | A::CloseSession | A::RecordMovement | A::TransferFunds
        ),
    }
}

/// Evaluates the policy table, returning an error suitable for the
/// boundary layer when the action is denied.
///
/// # Errors
///
/// Returns [`PolicyError`] when the role may not perform the action.
pub const fn authorize(role: Role, action: LedgerAction) -> Result<(), PolicyError> {
    if is_allowed(role, action) {
        Ok(())
    } else {
        Err(PolicyError { role, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::SuperAdmin)]
    #[case(Role::Admin)]
    fn test_admins_can_do_everything(#[case] role: Role) {
        for action in [
            LedgerAction::Settle,
            LedgerAction::Deallocate,
            LedgerAction::VoidInvoice,
            LedgerAction::ReceiveGoods,
            LedgerAction::OpenSession,
            LedgerAction::CloseSession,
            LedgerAction::RecordMovement,
            LedgerAction::TransferFunds,
        ] {
            assert!(is_allowed(role, action), "{role:?} should allow {action:?}");
        }
    }

    #[test]
    fn test_manager_cannot_deallocate() {
        assert!(!is_allowed(Role::Manager, LedgerAction::Deallocate));
        assert!(is_allowed(Role::Manager, LedgerAction::VoidInvoice));
        assert!(is_allowed(Role::Manager, LedgerAction::ReceiveGoods));
    }

    #[test]
    fn test_accountant_scope() {
        assert!(is_allowed(Role::Accountant, LedgerAction::Settle));
        assert!(is_allowed(Role::Accountant, LedgerAction::Deallocate));
        assert!(!is_allowed(Role::Accountant, LedgerAction::ReceiveGoods));
        assert!(!is_allowed(Role::Accountant, LedgerAction::OpenSession));
    }

    #[test]
    fn test_cashier_is_register_only() {
        assert!(is_allowed(Role::Cashier, LedgerAction::OpenSession));
        assert!(is_allowed(Role::Cashier, LedgerAction::RecordMovement));
        assert!(is_allowed(Role::Cashier, LedgerAction::TransferFunds));
        assert!(!is_allowed(Role::Cashier, LedgerAction::Settle));
        assert!(!is_allowed(Role::Cashier, LedgerAction::VoidInvoice));
        assert!(!is_allowed(Role::Cashier, LedgerAction::Deallocate));
    }

    #[test]
    fn test_authorize_surfaces_denials() {
        assert_eq!(
            authorize(Role::Cashier, LedgerAction::VoidInvoice),
            Err(PolicyError {
                role: Role::Cashier,
                action: LedgerAction::VoidInvoice,
            })
        );
        assert!(authorize(Role::Accountant, LedgerAction::CloseSession).is_ok());
    }
}
