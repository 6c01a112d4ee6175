use std::sync::Arc;

use mintgate_core::constants::MAX_FEE_PERCENT;
use mintgate_core::error::MintgateError;
use mintgate_core::event::EventRecord;
use mintgate_core::operation::{Call, Operation};
use mintgate_core::permission::Permission;
use mintgate_core::records::{AwardKind, EmissionChannel};
use mintgate_core::types::{AccountId, CallId, Timestamp};
use mintgate_emission::DistributionPlan;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::auth::{self, authorized_for, LockPolicy, TimedLocks};
use crate::db::StateDb;
use crate::ledger;
use crate::minting;
use crate::staged::StagedMutations;

// ── Receipt ───────────────────────────────────────────────────────────────────

/// Outcome of a committed call.
#[derive(Clone, Debug)]
pub struct Receipt {
    pub call_id: CallId,
    /// Audit events written by the call, in the order the changes were made.
    pub events: Vec<EventRecord>,
    /// Set for game-reward distributions.
    pub distribution: Option<DistributionPlan>,
}

// ── StateEngine ───────────────────────────────────────────────────────────────

/// The state transition engine.
///
/// Applies calls to the persistent ledger. Each `apply` call is atomic:
/// either every change the call makes is committed or none is. Calls are
/// serialized through a single writer lock, so no call observes another's
/// partial state.
pub struct StateEngine {
    pub db: Arc<StateDb>,
    lock_policy: Box<dyn LockPolicy>,
    writer: Mutex<()>,
}

impl StateEngine {
    pub fn new(db: Arc<StateDb>) -> Self {
        Self::with_lock_policy(db, Box::new(TimedLocks))
    }

    pub fn with_lock_policy(db: Arc<StateDb>, lock_policy: Box<dyn LockPolicy>) -> Self {
        Self { db, lock_policy, writer: Mutex::new(()) }
    }

    /// Apply one call at `now`. Returns the receipt on success; on failure
    /// nothing is written.
    pub fn apply(&self, call: &Call, now: Timestamp) -> Result<Receipt, MintgateError> {
        let _writer = self.writer.lock();

        if !self.db.is_initialized()? {
            return Err(MintgateError::NotInitialized);
        }
        let call_id = call.id(now);

        let mut staged = StagedMutations::new(&self.db);
        let distribution = match self.apply_operation(&mut staged, &call.caller, &call.operation, now) {
            Ok(d) => d,
            Err(e) => {
                debug!(%call_id, op = call.operation.label(), error = %e, "call rejected");
                return Err(e);
            }
        };

        // ── Commit ────────────────────────────────────────────────────────────
        let events = staged.commit(now)?;

        info!(
            %call_id,
            op = call.operation.label(),
            caller = %call.caller,
            events = events.len(),
            "applied call"
        );
        Ok(Receipt { call_id, events, distribution })
    }

    fn apply_operation(
        &self,
        staged: &mut StagedMutations<'_>,
        caller: &AccountId,
        operation: &Operation,
        now: Timestamp,
    ) -> Result<Option<DistributionPlan>, MintgateError> {
        match operation {
            // ── Grant / Revoke ────────────────────────────────────────────────
            Operation::Grant { account, permission } => {
                let permission = Permission::from_name(permission)?;
                auth::grant(staged, caller, *account, &[permission])?;
            }
            Operation::GrantMany { account, permissions } => {
                let permissions = Permission::resolve_all(permissions)?;
                auth::grant(staged, caller, *account, &permissions)?;
            }
            Operation::GrantAll { account } => {
                auth::grant(staged, caller, *account, &Permission::ALL)?;
            }
            Operation::Revoke { account, permission } => {
                let permission = Permission::from_name(permission)?;
                auth::revoke(staged, caller, *account, &[permission])?;
            }
            Operation::RevokeMany { account, permissions } => {
                let permissions = Permission::resolve_all(permissions)?;
                auth::revoke(staged, caller, *account, &permissions)?;
            }
            Operation::RevokeAll { account } => {
                auth::revoke(staged, caller, *account, &Permission::ALL)?;
            }

            // ── TransferOwnership ─────────────────────────────────────────────
            Operation::TransferOwnership { new_owner } => {
                auth::transfer_ownership(staged, caller, *new_owner)?;
            }

            // ── Permission locks ──────────────────────────────────────────────
            Operation::LockPermission { permission, duration } => {
                let permission = Permission::from_name(permission)?;
                auth::lock_permission(
                    staged,
                    self.lock_policy.as_ref(),
                    caller,
                    permission,
                    *duration,
                    now,
                )?;
            }
            Operation::UnlockPermission { permission } => {
                let permission = Permission::from_name(permission)?;
                auth::unlock_permission(staged, self.lock_policy.as_ref(), permission, now)?;
            }

            // ── Emission settings ─────────────────────────────────────────────
            Operation::SetEmissionActive { active } => {
                authorized_for(staged, caller, Permission::AdjustMinting)?;
                let mut config = staged.staking()?;
                config.active = *active;
                staged.set_staking(config);
                info!(active, "staking emission switched");
            }
            Operation::SetStakingAddress { address } => {
                authorized_for(staged, caller, Permission::AdjustMinting)?;
                if address.is_null() {
                    return Err(MintgateError::ZeroAddress);
                }
                let mut config = staged.staking()?;
                config.staking_address = Some(*address);
                staged.set_staking(config);
                info!(%address, "staking address set");
            }
            Operation::SetEmissionRate { channel, rate_per_second } => {
                authorized_for(staged, caller, settings_permission(*channel))?;
                // The clock stays put: the new rate prices the whole unclaimed window.
                let mut state = staged.emission(*channel)?;
                state.rate_per_second = *rate_per_second;
                staged.set_emission(*channel, state);
                info!(%channel, rate_per_second, "emission rate set");
            }
            Operation::SetEmissionCap { channel, cap } => {
                authorized_for(staged, caller, settings_permission(*channel))?;
                let mut state = staged.emission(*channel)?;
                state.cap = *cap;
                staged.set_emission(*channel, state);
                info!(%channel, cap, "emission cap set");
            }
            Operation::SetAward { kind, amount } => {
                authorized_for(staged, caller, Permission::AdjustVariables)?;
                let mut awards = staged.awards()?;
                match kind {
                    AwardKind::Winner => awards.winner = *amount,
                    AwardKind::Loser => awards.loser = *amount,
                }
                staged.set_awards(awards);
            }

            // ── Emission claims ───────────────────────────────────────────────
            Operation::ClaimStakingEmission => {
                minting::claim_staking(staged, now)?;
            }
            Operation::SpecialEmission { amount } => {
                authorized_for(staged, caller, Permission::Emission)?;
                minting::special_emission(staged, *caller, *amount, now)?;
            }
            Operation::DistributeBestEffort { rewards } => {
                authorized_for(staged, caller, Permission::GameEmission)?;
                return minting::distribute_best_effort(staged, rewards, now).map(Some);
            }
            Operation::DistributeStrict { rewards, declared_total } => {
                authorized_for(staged, caller, Permission::GameEmission)?;
                return minting::distribute_strict(staged, rewards, *declared_total, now).map(Some);
            }
            Operation::DistributeFixedAward { kind, recipients } => {
                authorized_for(staged, caller, Permission::GameEmission)?;
                return minting::distribute_fixed_award(staged, *kind, recipients, now).map(Some);
            }

            // ── Ledger ────────────────────────────────────────────────────────
            Operation::Transfer { to, amount } => {
                ledger::transfer(staged, *caller, *to, *amount, now)?;
            }
            Operation::Approve { spender, amount } => {
                ledger::approve(staged, *caller, *spender, *amount)?;
            }
            Operation::TransferFrom { from, to, amount } => {
                ledger::transfer_from(staged, *caller, *from, *to, *amount, now)?;
            }

            // ── Fees ──────────────────────────────────────────────────────────
            Operation::SetFeePercent { percent } => {
                authorized_for(staged, caller, Permission::AdjustVariables)?;
                if *percent > MAX_FEE_PERCENT {
                    return Err(MintgateError::FeeTooHigh { got: *percent, max: MAX_FEE_PERCENT });
                }
                let mut fees = staged.fees()?;
                fees.percent = *percent;
                staged.set_fees(fees);
            }
            Operation::SetFeeRecipient { recipient } => {
                authorized_for(staged, caller, Permission::AdjustVariables)?;
                if recipient.is_null() {
                    return Err(MintgateError::ZeroAddress);
                }
                let mut fees = staged.fees()?;
                fees.recipient = Some(*recipient);
                staged.set_fees(fees);
            }
            Operation::SetFeeExempt { account, exempt } => {
                authorized_for(staged, caller, Permission::AdjustVariables)?;
                staged.set_fee_exempt(*account, *exempt);
            }
            Operation::SetFeePair { account, is_pair } => {
                authorized_for(staged, caller, Permission::AdjustVariables)?;
                staged.set_fee_pair(*account, *is_pair);
            }
        }
        Ok(None)
    }
}

/// Staking settings belong to minting administration; the other channels
/// are ordinary tunables.
fn settings_permission(channel: EmissionChannel) -> Permission {
    match channel {
        EmissionChannel::Staking => Permission::AdjustMinting,
        EmissionChannel::Special | EmissionChannel::Game => Permission::AdjustVariables,
    }
}
