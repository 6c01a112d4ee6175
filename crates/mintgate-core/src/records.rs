use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{AccountId, Balance, Timestamp};

// ── PermissionLock ────────────────────────────────────────────────────────────

/// Lock record for one permission.
///
/// A lock never clears itself: once `expiry` has passed an explicit unlock
/// call is still required before the permission is enforceable again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLock {
    pub locked: bool,
    pub expiry: Timestamp,
}

impl PermissionLock {
    pub fn is_active(&self) -> bool {
        self.locked
    }
}

// ── Emission ──────────────────────────────────────────────────────────────────

/// The three independent emission pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionChannel {
    /// Passive emission to the staking address, claimed on transfers.
    Staking,
    /// Administrator emission, claimed by the caller for itself.
    Special,
    /// Game rewards, claimed through batch distribution.
    Game,
}

impl EmissionChannel {
    pub const ALL: [EmissionChannel; 3] =
        [EmissionChannel::Staking, EmissionChannel::Special, EmissionChannel::Game];

    pub fn key(self) -> &'static str {
        match self {
            EmissionChannel::Staking => "staking",
            EmissionChannel::Special => "special",
            EmissionChannel::Game => "game",
        }
    }
}

impl fmt::Display for EmissionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Rate, cap and clock of one emission channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionState {
    /// Units accrued per elapsed second.
    pub rate_per_second: Balance,
    /// Maximum backlog the channel can hold.
    pub cap: Balance,
    /// Start of the unclaimed window. Only ever moves forward.
    pub last_claim: Timestamp,
}

impl EmissionState {
    pub fn new(rate_per_second: Balance, cap: Balance, started_at: Timestamp) -> Self {
        Self { rate_per_second, cap, last_claim: started_at }
    }
}

/// Switches for the passive staking channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingConfig {
    pub active: bool,
    pub staking_address: Option<AccountId>,
}

impl StakingConfig {
    /// The address staking emission flows to, if emission is switched on.
    pub fn destination(&self) -> Option<AccountId> {
        if self.active {
            self.staking_address
        } else {
            None
        }
    }
}

/// Fixed per-recipient game awards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardConfig {
    pub winner: Balance,
    pub loser: Balance,
}

/// Which fixed award a batch pays out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    Winner,
    Loser,
}

impl AwardConfig {
    pub fn amount(&self, kind: AwardKind) -> Balance {
        match kind {
            AwardKind::Winner => self.winner,
            AwardKind::Loser => self.loser,
        }
    }
}

// ── Fees ──────────────────────────────────────────────────────────────────────

/// Transfer fee settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Whole percent taken from fee-bearing transfers.
    pub percent: u8,
    pub recipient: Option<AccountId>,
}

impl FeeSchedule {
    pub fn fee_for(&self, amount: Balance) -> Balance {
        if self.recipient.is_none() {
            return 0;
        }
        amount / 100 * self.percent as u128 + amount % 100 * self.percent as u128 / 100
    }
}

// ── Token metadata ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}
