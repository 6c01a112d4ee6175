use thiserror::Error;

use crate::permission::Permission;
use crate::types::{Balance, Timestamp};

/// Coarse failure category, stable enough for callers to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// "Not allowed": missing grant, locked permission, owner rules.
    Authorization,
    /// "Nothing available yet" or "asked for too much".
    Budget,
    /// "Insufficient funds" and other balance bookkeeping failures.
    Ledger,
    Arithmetic,
    Storage,
}

#[derive(Debug, Error)]
pub enum MintgateError {
    // ── Authorization errors ─────────────────────────────────────────────────
    #[error("caller is not authorized for permission {0}")]
    NotAuthorized(Permission),

    #[error("permission {0} is locked")]
    PermissionLocked(Permission),

    #[error("caller is not the owner")]
    NotOwner,

    #[error("cannot revoke permissions from the owner")]
    CannotRevokeOwner,

    #[error("unknown permission name: {0}")]
    UnknownPermission(String),

    // ── Budget errors ────────────────────────────────────────────────────────
    #[error("nothing to claim")]
    NothingToClaim,

    #[error("budget exceeded: requested {requested}, available {available}")]
    BudgetExceeded { requested: Balance, available: Balance },

    #[error("permission {permission} still locked until {expiry}")]
    StillLocked { permission: Permission, expiry: Timestamp },

    #[error("staking emission is not active")]
    EmissionInactive,

    #[error("no staking address configured")]
    NoStakingAddress,

    // ── Ledger errors ────────────────────────────────────────────────────────
    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: Balance, have: Balance },

    #[error("insufficient allowance: need {need}, have {have}")]
    InsufficientAllowance { need: Balance, have: Balance },

    #[error("the null account cannot take part in this operation")]
    ZeroAddress,

    #[error("amount must be greater than zero")]
    AmountZero,

    #[error("fee percent {got} exceeds maximum of {max}")]
    FeeTooHigh { got: u8, max: u8 },

    #[error("invalid account id: {0}")]
    InvalidAccount(String),

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    // ── Genesis ──────────────────────────────────────────────────────────────
    #[error("ledger already initialized")]
    AlreadyInitialized,

    #[error("ledger not initialized")]
    NotInitialized,

    #[error("genesis supply mismatch: expected {expected}, got {got}")]
    GenesisSupplyMismatch { expected: Balance, got: Balance },
}

impl MintgateError {
    pub fn kind(&self) -> ErrorKind {
        use MintgateError::*;
        match self {
            NotAuthorized(_) | PermissionLocked(_) | NotOwner | CannotRevokeOwner
            | UnknownPermission(_) => ErrorKind::Authorization,
            NothingToClaim | BudgetExceeded { .. } | StillLocked { .. } | EmissionInactive
            | NoStakingAddress => ErrorKind::Budget,
            InsufficientBalance { .. } | InsufficientAllowance { .. } | ZeroAddress
            | AmountZero | FeeTooHigh { .. } | InvalidAccount(_) => ErrorKind::Ledger,
            ArithmeticOverflow => ErrorKind::Arithmetic,
            Serialization(_) | Storage(_) | AlreadyInitialized | NotInitialized
            | GenesisSupplyMismatch { .. } => ErrorKind::Storage,
        }
    }
}
