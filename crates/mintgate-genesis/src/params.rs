use mintgate_core::constants::{
    DEFAULT_DECIMALS, DEFAULT_FEE_PERCENT, DEFAULT_GAME_CAP, DEFAULT_GAME_RATE,
    DEFAULT_INITIAL_SUPPLY, DEFAULT_LOSER_AWARD, DEFAULT_SPECIAL_CAP, DEFAULT_SPECIAL_RATE,
    DEFAULT_STAKING_CAP, DEFAULT_STAKING_RATE, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL,
    DEFAULT_WINNER_AWARD,
};
use mintgate_core::error::MintgateError;
use mintgate_core::types::{AccountId, Balance};
use serde::{Deserialize, Serialize};

/// Launch parameters for a new ledger.
///
/// Only `owner` is required; every other field falls back to the protocol
/// defaults, so a minimal params file is `{"owner": "<base58>"}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisParams {
    /// Receives every permission and the initial supply.
    pub owner: AccountId,

    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default = "default_initial_supply")]
    pub initial_supply: Balance,

    #[serde(default = "default_staking_rate")]
    pub staking_rate: Balance,
    #[serde(default = "default_staking_cap")]
    pub staking_cap: Balance,
    /// Staking emission starts switched off even when an address is given.
    #[serde(default)]
    pub staking_address: Option<AccountId>,

    #[serde(default = "default_special_rate")]
    pub special_rate: Balance,
    #[serde(default = "default_special_cap")]
    pub special_cap: Balance,

    #[serde(default = "default_game_rate")]
    pub game_rate: Balance,
    #[serde(default = "default_game_cap")]
    pub game_cap: Balance,
    #[serde(default = "default_winner_award")]
    pub winner_award: Balance,
    #[serde(default = "default_loser_award")]
    pub loser_award: Balance,

    #[serde(default = "default_fee_percent")]
    pub fee_percent: u8,
    #[serde(default)]
    pub fee_recipient: Option<AccountId>,
}

impl GenesisParams {
    /// Protocol defaults with the given owner.
    pub fn for_owner(owner: AccountId) -> Self {
        Self {
            owner,
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            initial_supply: default_initial_supply(),
            staking_rate: default_staking_rate(),
            staking_cap: default_staking_cap(),
            staking_address: None,
            special_rate: default_special_rate(),
            special_cap: default_special_cap(),
            game_rate: default_game_rate(),
            game_cap: default_game_cap(),
            winner_award: default_winner_award(),
            loser_award: default_loser_award(),
            fee_percent: default_fee_percent(),
            fee_recipient: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, MintgateError> {
        serde_json::from_str(json).map_err(|e| MintgateError::Serialization(e.to_string()))
    }
}

fn default_name() -> String {
    DEFAULT_TOKEN_NAME.to_string()
}
fn default_symbol() -> String {
    DEFAULT_TOKEN_SYMBOL.to_string()
}
fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}
fn default_initial_supply() -> Balance {
    DEFAULT_INITIAL_SUPPLY
}
fn default_staking_rate() -> Balance {
    DEFAULT_STAKING_RATE
}
fn default_staking_cap() -> Balance {
    DEFAULT_STAKING_CAP
}
fn default_special_rate() -> Balance {
    DEFAULT_SPECIAL_RATE
}
fn default_special_cap() -> Balance {
    DEFAULT_SPECIAL_CAP
}
fn default_game_rate() -> Balance {
    DEFAULT_GAME_RATE
}
fn default_game_cap() -> Balance {
    DEFAULT_GAME_CAP
}
fn default_winner_award() -> Balance {
    DEFAULT_WINNER_AWARD
}
fn default_loser_award() -> Balance {
    DEFAULT_LOSER_AWARD
}
fn default_fee_percent() -> u8 {
    DEFAULT_FEE_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_takes_defaults() {
        let owner = AccountId::derive("owner");
        let params = GenesisParams::from_json(&format!(r#"{{"owner":"{owner}"}}"#)).unwrap();
        assert_eq!(params, GenesisParams::for_owner(owner));
    }

    #[test]
    fn missing_owner_is_rejected() {
        assert!(matches!(
            GenesisParams::from_json(r#"{"initial_supply": 5}"#),
            Err(MintgateError::Serialization(_))
        ));
    }
}
