/// ─── MintGate Protocol Constants ────────────────────────────────────────────
///
/// Base unit: 1 MGT = 10^18 units (18 decimals).
/// Emission is expressed in units per second; caps bound the backlog a
/// channel may accrue while nobody claims it.

// ── Token metadata ───────────────────────────────────────────────────────────

pub const DEFAULT_TOKEN_NAME: &str = "MintGate Token";
pub const DEFAULT_TOKEN_SYMBOL: &str = "MGT";
pub const DEFAULT_DECIMALS: u8 = 18;

/// 1 MGT expressed in base units.
pub const UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Supply minted to the owner at genesis (base units).
pub const DEFAULT_INITIAL_SUPPLY: u128 = 1_000_000_000 * UNITS_PER_TOKEN;

// ── Staking emission ─────────────────────────────────────────────────────────

/// Passive emission rate: 1 MGT per second.
pub const DEFAULT_STAKING_RATE: u128 = UNITS_PER_TOKEN;

/// Staking backlog cap: one day of emission.
pub const DEFAULT_STAKING_CAP: u128 = 86_400 * DEFAULT_STAKING_RATE;

// ── Special (administrator) emission ─────────────────────────────────────────

pub const DEFAULT_SPECIAL_RATE: u128 = UNITS_PER_TOKEN / 10;

/// Special emission backlog cap: 30 days of emission.
pub const DEFAULT_SPECIAL_CAP: u128 = 30 * 86_400 * DEFAULT_SPECIAL_RATE;

// ── Game-reward emission ─────────────────────────────────────────────────────

pub const DEFAULT_GAME_RATE: u128 = UNITS_PER_TOKEN / 2;

/// Game emission backlog cap: 7 days of emission.
pub const DEFAULT_GAME_CAP: u128 = 7 * 86_400 * DEFAULT_GAME_RATE;

/// Fixed per-recipient award for game winners.
pub const DEFAULT_WINNER_AWARD: u128 = 100 * UNITS_PER_TOKEN;

/// Fixed per-recipient award for game losers.
pub const DEFAULT_LOSER_AWARD: u128 = 10 * UNITS_PER_TOKEN;

// ── Transfer fees ────────────────────────────────────────────────────────────

/// Upper bound on the transfer fee percentage.
pub const MAX_FEE_PERCENT: u8 = 10;

pub const DEFAULT_FEE_PERCENT: u8 = 0;
