use serde::{Deserialize, Serialize};

use crate::records::{AwardKind, EmissionChannel};
use crate::types::{AccountId, Balance, CallId, Timestamp};

// ── Reward ────────────────────────────────────────────────────────────────────

/// One line of a game-reward batch.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reward {
    pub account: AccountId,
    pub amount: Balance,
}

impl Reward {
    pub fn new(account: AccountId, amount: Balance) -> Self {
        Self { account, amount }
    }
}

// ── Operation ─────────────────────────────────────────────────────────────────

/// Every state-changing call into the ledger is one of these variants.
///
/// Permission names stay strings here; they are resolved (and rejected if
/// unknown) when the call is applied.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    // ── Authorization ────────────────────────────────────────────────────────
    Grant { account: AccountId, permission: String },
    GrantMany { account: AccountId, permissions: Vec<String> },
    GrantAll { account: AccountId },
    Revoke { account: AccountId, permission: String },
    RevokeMany { account: AccountId, permissions: Vec<String> },
    RevokeAll { account: AccountId },
    TransferOwnership { new_owner: AccountId },

    // ── Permission locks ─────────────────────────────────────────────────────
    /// Lock a permission for `duration` seconds from now.
    LockPermission { permission: String, duration: u64 },
    /// Clear an expired lock. Open to any caller.
    UnlockPermission { permission: String },

    // ── Emission settings ────────────────────────────────────────────────────
    SetEmissionActive { active: bool },
    SetStakingAddress { address: AccountId },
    SetEmissionRate { channel: EmissionChannel, rate_per_second: Balance },
    SetEmissionCap { channel: EmissionChannel, cap: Balance },
    SetAward { kind: AwardKind, amount: Balance },

    // ── Emission claims ──────────────────────────────────────────────────────
    ClaimStakingEmission,
    /// Mint `amount` from the special channel to the caller.
    SpecialEmission { amount: Balance },
    /// Mint the longest prefix of `rewards` that fits the game budget.
    DistributeBestEffort { rewards: Vec<Reward> },
    /// Mint all of `rewards` or nothing.
    DistributeStrict { rewards: Vec<Reward>, declared_total: Balance },
    /// Mint the configured winner or loser award to every recipient, all or nothing.
    DistributeFixedAward { kind: AwardKind, recipients: Vec<AccountId> },

    // ── Ledger ───────────────────────────────────────────────────────────────
    Transfer { to: AccountId, amount: Balance },
    Approve { spender: AccountId, amount: Balance },
    TransferFrom { from: AccountId, to: AccountId, amount: Balance },

    // ── Fees ─────────────────────────────────────────────────────────────────
    SetFeePercent { percent: u8 },
    SetFeeRecipient { recipient: AccountId },
    SetFeeExempt { account: AccountId, exempt: bool },
    SetFeePair { account: AccountId, is_pair: bool },
}

impl Operation {
    /// Short name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Grant { .. } => "grant",
            Operation::GrantMany { .. } => "grant_many",
            Operation::GrantAll { .. } => "grant_all",
            Operation::Revoke { .. } => "revoke",
            Operation::RevokeMany { .. } => "revoke_many",
            Operation::RevokeAll { .. } => "revoke_all",
            Operation::TransferOwnership { .. } => "transfer_ownership",
            Operation::LockPermission { .. } => "lock_permission",
            Operation::UnlockPermission { .. } => "unlock_permission",
            Operation::SetEmissionActive { .. } => "set_emission_active",
            Operation::SetStakingAddress { .. } => "set_staking_address",
            Operation::SetEmissionRate { .. } => "set_emission_rate",
            Operation::SetEmissionCap { .. } => "set_emission_cap",
            Operation::SetAward { .. } => "set_award",
            Operation::ClaimStakingEmission => "claim_staking_emission",
            Operation::SpecialEmission { .. } => "special_emission",
            Operation::DistributeBestEffort { .. } => "distribute_best_effort",
            Operation::DistributeStrict { .. } => "distribute_strict",
            Operation::DistributeFixedAward { .. } => "distribute_fixed_award",
            Operation::Transfer { .. } => "transfer",
            Operation::Approve { .. } => "approve",
            Operation::TransferFrom { .. } => "transfer_from",
            Operation::SetFeePercent { .. } => "set_fee_percent",
            Operation::SetFeeRecipient { .. } => "set_fee_recipient",
            Operation::SetFeeExempt { .. } => "set_fee_exempt",
            Operation::SetFeePair { .. } => "set_fee_pair",
        }
    }
}

// ── Call ──────────────────────────────────────────────────────────────────────

/// An operation together with the identity invoking it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Call {
    pub caller: AccountId,
    pub operation: Operation,
}

impl Call {
    pub fn new(caller: AccountId, operation: Operation) -> Self {
        Self { caller, operation }
    }

    /// Identifier of this call as applied at `now`.
    pub fn id(&self, now: Timestamp) -> CallId {
        let body = bincode::serialize(self).unwrap_or_default();
        let mut h = blake3::Hasher::new();
        h.update(&body);
        h.update(&now.to_le_bytes());
        CallId(*h.finalize().as_bytes())
    }
}
