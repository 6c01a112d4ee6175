//! mintgate-genesis
//!
//! Seeds a new ledger in an empty `StateDb`. Genesis goes through the same
//! staged overlay and single commit as every later call, but skips the
//! permission checks: it is what creates the first permissions.
//!
//! Genesis state at `now`:
//!
//! 1. Owner            — all seven permissions, one `Granted` event each,
//!                       then `OwnershipTransferred` from the null account
//! 2. Initial supply   — minted to the owner (one transfer-from-null event)
//! 3. Emission clocks  — staking, special and game all start at `now`;
//!                       staking emission starts switched off
//! 4. Awards and fees  — from `GenesisParams`

pub mod params;

pub use params::GenesisParams;

use mintgate_core::constants::MAX_FEE_PERCENT;
use mintgate_core::error::MintgateError;
use mintgate_core::event::LedgerEvent;
use mintgate_core::permission::Permission;
use mintgate_core::records::{
    AwardConfig, EmissionChannel, EmissionState, FeeSchedule, StakingConfig, TokenInfo,
};
use mintgate_core::types::{AccountId, Balance, Timestamp};
use mintgate_state::ledger;
use mintgate_state::{StagedMutations, StateDb};
use tracing::info;

/// What genesis wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisSummary {
    pub owner: AccountId,
    pub total_supply: Balance,
    pub events: usize,
    pub started_at: Timestamp,
}

/// Apply genesis to an empty `StateDb`.
///
/// Fails with `AlreadyInitialized` if the database already has an owner.
pub fn apply_genesis(
    db: &StateDb,
    params: &GenesisParams,
    now: Timestamp,
) -> Result<GenesisSummary, MintgateError> {
    if db.is_initialized()? {
        return Err(MintgateError::AlreadyInitialized);
    }
    if params.owner.is_null() {
        return Err(MintgateError::ZeroAddress);
    }
    if params.fee_percent > MAX_FEE_PERCENT {
        return Err(MintgateError::FeeTooHigh { got: params.fee_percent, max: MAX_FEE_PERCENT });
    }
    info!(owner = %params.owner, symbol = %params.symbol, "applying genesis");

    let owner = params.owner;
    let mut staged = StagedMutations::new(db);

    // ── 1. Owner and permissions ─────────────────────────────────────────────
    staged.set_owner(owner);
    for permission in Permission::ALL {
        staged.set_grant(owner, permission, true);
        staged.emit(LedgerEvent::Granted { account: owner, permission });
    }
    staged.emit(LedgerEvent::OwnershipTransferred { previous: AccountId::NULL, new_owner: owner });

    // ── 2. Initial supply ────────────────────────────────────────────────────
    staged.set_total_supply(0);
    if params.initial_supply > 0 {
        ledger::mint(&mut staged, owner, params.initial_supply)?;
    }
    info!(supply = params.initial_supply, "genesis: initial supply minted");

    // ── 3. Emission channels ─────────────────────────────────────────────────
    let channels = [
        (EmissionChannel::Staking, params.staking_rate, params.staking_cap),
        (EmissionChannel::Special, params.special_rate, params.special_cap),
        (EmissionChannel::Game, params.game_rate, params.game_cap),
    ];
    for (channel, rate, cap) in channels {
        staged.set_emission(channel, EmissionState::new(rate, cap, now));
        info!(%channel, rate, cap, "genesis: emission channel started");
    }
    staged.set_staking(StakingConfig { active: false, staking_address: params.staking_address });

    // ── 4. Awards, fees, metadata ────────────────────────────────────────────
    staged.set_awards(AwardConfig { winner: params.winner_award, loser: params.loser_award });
    staged.set_fees(FeeSchedule { percent: params.fee_percent, recipient: params.fee_recipient });
    staged.set_token_info(TokenInfo {
        name: params.name.clone(),
        symbol: params.symbol.clone(),
        decimals: params.decimals,
    });

    let events = staged.commit(now)?;

    // ── Verify supply ────────────────────────────────────────────────────────
    verify_genesis_supply(db, params.initial_supply)?;

    db.flush()?;
    info!(events = events.len(), "genesis state committed to disk");

    Ok(GenesisSummary {
        owner,
        total_supply: params.initial_supply,
        events: events.len(),
        started_at: now,
    })
}

/// Check that stored balances and the recorded supply both equal `expected`.
pub fn verify_genesis_supply(db: &StateDb, expected: Balance) -> Result<(), MintgateError> {
    let balances = db.sum_balances()?;
    if balances != expected {
        return Err(MintgateError::GenesisSupplyMismatch { expected, got: balances });
    }
    let recorded = db.total_supply()?;
    if recorded != expected {
        return Err(MintgateError::GenesisSupplyMismatch { expected, got: recorded });
    }
    info!(total = expected, "genesis supply verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintgate_state::LedgerQuery;

    fn temp_db(name: &str) -> StateDb {
        let dir = std::env::temp_dir().join(format!("mintgate_genesis_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        StateDb::open(&dir).unwrap()
    }

    fn test_params() -> GenesisParams {
        let mut params = GenesisParams::for_owner(AccountId::derive("founder"));
        params.initial_supply = 5_000;
        params
    }

    #[test]
    fn genesis_seeds_owner_supply_and_clocks() {
        let db = temp_db("seed");
        let params = test_params();
        let summary = apply_genesis(&db, &params, 1_000).expect("genesis must succeed");

        let q = LedgerQuery::new(&db);
        assert_eq!(q.owner().unwrap(), params.owner);
        assert_eq!(q.balance(&params.owner).unwrap(), 5_000);
        assert_eq!(q.total_supply().unwrap(), 5_000);
        for permission in Permission::ALL {
            assert!(q.has_permission(&params.owner, permission).unwrap());
        }
        for channel in EmissionChannel::ALL {
            assert_eq!(q.emission(channel).unwrap().last_claim, 1_000);
            assert_eq!(q.mintable(channel, 1_000).unwrap(), 0);
        }
        assert!(!q.staking().unwrap().active);
        assert_eq!(summary.events, Permission::ALL.len() + 2);
    }

    #[test]
    fn genesis_events_are_grants_then_ownership_then_mint() {
        let db = temp_db("events");
        let params = test_params();
        apply_genesis(&db, &params, 0).unwrap();

        let events: Vec<LedgerEvent> = db.events_since(0).unwrap().into_iter().map(|r| r.event).collect();
        let n = Permission::ALL.len();
        assert!(events[..n].iter().all(|e| matches!(e, LedgerEvent::Granted { .. })));
        assert_eq!(
            events[n],
            LedgerEvent::OwnershipTransferred { previous: AccountId::NULL, new_owner: params.owner }
        );
        assert_eq!(events[n + 1], LedgerEvent::mint(params.owner, 5_000));
    }

    #[test]
    fn genesis_applies_once() {
        let db = temp_db("once");
        apply_genesis(&db, &test_params(), 0).unwrap();
        assert!(matches!(
            apply_genesis(&db, &test_params(), 1),
            Err(MintgateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn genesis_rejects_bad_params() {
        let db = temp_db("bad_params");
        let mut params = test_params();
        params.fee_percent = MAX_FEE_PERCENT + 1;
        assert!(matches!(apply_genesis(&db, &params, 0), Err(MintgateError::FeeTooHigh { .. })));

        let params = GenesisParams::for_owner(AccountId::NULL);
        assert!(matches!(apply_genesis(&db, &params, 0), Err(MintgateError::ZeroAddress)));
        assert!(!db.is_initialized().unwrap());
    }
}
