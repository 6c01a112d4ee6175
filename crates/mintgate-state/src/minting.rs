//! Emission claims: staking, special, and game-reward distribution.
//!
//! Each claim opens one `ClaimWindow` at the call's timestamp, mints, and
//! then settles the channel with the amount actually minted.

use mintgate_core::error::MintgateError;
use mintgate_core::operation::Reward;
use mintgate_core::records::{AwardKind, EmissionChannel};
use mintgate_core::types::{AccountId, Balance, Timestamp};
use mintgate_emission::{plan_best_effort, plan_fixed_award, plan_strict, ClaimWindow, DistributionPlan};
use tracing::{debug, info};

use crate::ledger;
use crate::staged::StagedMutations;

// ── Staking ───────────────────────────────────────────────────────────────────

/// Mint the whole staking backlog to the staking address.
pub fn claim_staking(staged: &mut StagedMutations<'_>, now: Timestamp) -> Result<Balance, MintgateError> {
    let config = staged.staking()?;
    if !config.active {
        return Err(MintgateError::EmissionInactive);
    }
    let destination = config.staking_address.ok_or(MintgateError::NoStakingAddress)?;
    let mut state = staged.emission(EmissionChannel::Staking)?;
    let window = ClaimWindow::open(&state, now)?;

    ledger::mint(staged, destination, window.available)?;
    window.settle(&mut state, window.available)?;
    staged.set_emission(EmissionChannel::Staking, state);
    info!(to = %destination, amount = window.available, "staking emission claimed");
    Ok(window.available)
}

/// The transfer-time variant. Returns 0 instead of failing when there is
/// nothing the staking channel could pay out.
pub fn claim_staking_if_due(staged: &mut StagedMutations<'_>, now: Timestamp) -> Result<Balance, MintgateError> {
    match claim_staking(staged, now) {
        Ok(amount) => Ok(amount),
        Err(MintgateError::EmissionInactive)
        | Err(MintgateError::NoStakingAddress)
        | Err(MintgateError::NothingToClaim) => Ok(0),
        Err(e) => Err(e),
    }
}

// ── Special ───────────────────────────────────────────────────────────────────

/// Mint `amount` from the special channel to the caller.
pub fn special_emission(
    staged: &mut StagedMutations<'_>,
    caller: AccountId,
    amount: Balance,
    now: Timestamp,
) -> Result<(), MintgateError> {
    if amount == 0 {
        return Err(MintgateError::AmountZero);
    }
    let mut state = staged.emission(EmissionChannel::Special)?;
    let window = ClaimWindow::open(&state, now)?;
    window.ensure_covers(amount)?;

    ledger::mint(staged, caller, amount)?;
    window.settle(&mut state, amount)?;
    staged.set_emission(EmissionChannel::Special, state);
    info!(to = %caller, amount, "special emission claimed");
    Ok(())
}

// ── Game rewards ──────────────────────────────────────────────────────────────

pub fn distribute_best_effort(
    staged: &mut StagedMutations<'_>,
    rewards: &[Reward],
    now: Timestamp,
) -> Result<DistributionPlan, MintgateError> {
    distribute(staged, now, |available| Ok(plan_best_effort(rewards, available)))
}

pub fn distribute_strict(
    staged: &mut StagedMutations<'_>,
    rewards: &[Reward],
    declared_total: Balance,
    now: Timestamp,
) -> Result<DistributionPlan, MintgateError> {
    distribute(staged, now, |available| plan_strict(rewards, declared_total, available))
}

pub fn distribute_fixed_award(
    staged: &mut StagedMutations<'_>,
    kind: AwardKind,
    recipients: &[AccountId],
    now: Timestamp,
) -> Result<DistributionPlan, MintgateError> {
    let amount = staged.awards()?.amount(kind);
    distribute(staged, now, |available| plan_fixed_award(recipients, amount, available))
}

fn distribute<F>(
    staged: &mut StagedMutations<'_>,
    now: Timestamp,
    planner: F,
) -> Result<DistributionPlan, MintgateError>
where
    F: FnOnce(Balance) -> Result<DistributionPlan, MintgateError>,
{
    let mut state = staged.emission(EmissionChannel::Game)?;
    let window = ClaimWindow::open(&state, now)?;
    let plan = planner(window.available)?;

    for reward in &plan.payouts {
        ledger::mint(staged, reward.account, reward.amount)?;
    }
    window.settle(&mut state, plan.total)?;
    staged.set_emission(EmissionChannel::Game, state);

    if plan.skipped > 0 {
        debug!(skipped = plan.skipped, "game rewards left for a later batch");
    }
    info!(
        recipients = plan.payouts.len(),
        total = plan.total,
        available = window.available,
        "game rewards distributed"
    );
    Ok(plan)
}
