use serde::{Deserialize, Serialize};

use crate::permission::Permission;
use crate::types::{AccountId, Balance, Timestamp};

/// Append-only audit record. One event per state change, in the order the
/// changes were made.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    Granted { account: AccountId, permission: Permission },
    Revoked { account: AccountId, permission: Permission },
    OwnershipTransferred { previous: AccountId, new_owner: AccountId },
    PermissionLocked { permission: Permission, expiry: Timestamp },
    PermissionUnlocked { permission: Permission },
    /// Balance movement; `from` is the null account for mints.
    Transfer { from: AccountId, to: AccountId, amount: Balance },
    Approval { owner: AccountId, spender: AccountId, amount: Balance },
}

impl LedgerEvent {
    pub fn mint(to: AccountId, amount: Balance) -> Self {
        LedgerEvent::Transfer { from: AccountId::NULL, to, amount }
    }

    pub fn is_mint(&self) -> bool {
        matches!(self, LedgerEvent::Transfer { from, .. } if from.is_null())
    }
}

/// An event together with its position in the audit log.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    pub seq: u64,
    pub at: Timestamp,
    pub event: LedgerEvent,
}
