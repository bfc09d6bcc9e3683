//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `PaymentId` where an
//! `InvoiceId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(InvoiceId, "Unique identifier for a customer or supplier invoice.");
typed_id!(InvoiceLineId, "Unique identifier for a supplier invoice line.");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(CreditNoteId, "Unique identifier for a credit note.");
typed_id!(AllocationId, "Unique identifier for an allocation record.");
typed_id!(CashRegisterId, "Unique identifier for a cash register.");
typed_id!(CashSessionId, "Unique identifier for a cash register session.");
typed_id!(CashMovementId, "Unique identifier for a cash movement.");
typed_id!(UserId, "Unique identifier for a user.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(InvoiceId::new(), InvoiceId::new());
    }

    #[test]
    fn test_round_trip_through_uuid() {
        let id = PaymentId::new();
        assert_eq!(PaymentId::from_uuid(id.into_inner()), id);
    }

    #[test]
    fn test_parse_display_round_trip() {
        let id = CashSessionId::new();
        let parsed = CashSessionId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(InvoiceId::from_str("not-a-uuid").is_err());
    }
}
