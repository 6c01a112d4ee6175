//! Batch reward planning against a single claimed budget.
//!
//! Planners only decide which rewards are paid. The caller mints the
//! returned payouts in order and settles the channel with `plan.total`.

use mintgate_core::error::MintgateError;
use mintgate_core::operation::Reward;
use mintgate_core::types::{AccountId, Balance};
use serde::Serialize;

/// Rewards accepted for minting, in submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DistributionPlan {
    pub payouts: Vec<Reward>,
    /// Sum of `payouts`.
    pub total: Balance,
    /// Entries left unpaid (best-effort only).
    pub skipped: usize,
}

/// Accept rewards in order until the next one would overflow `available`.
///
/// Everything from that entry on is skipped, even if a later, smaller entry
/// would still fit: earlier entries are never passed over.
pub fn plan_best_effort(rewards: &[Reward], available: Balance) -> DistributionPlan {
    let mut plan = DistributionPlan::default();
    for (i, reward) in rewards.iter().enumerate() {
        match plan.total.checked_add(reward.amount) {
            Some(next) if next <= available => {
                plan.total = next;
                plan.payouts.push(*reward);
            }
            _ => {
                plan.skipped = rewards.len() - i;
                break;
            }
        }
    }
    plan
}

/// Accept every reward or fail with `BudgetExceeded`.
///
/// `declared_total` is checked against `available` before iterating.
pub fn plan_strict(
    rewards: &[Reward],
    declared_total: Balance,
    available: Balance,
) -> Result<DistributionPlan, MintgateError> {
    if declared_total > available {
        return Err(MintgateError::BudgetExceeded { requested: declared_total, available });
    }
    let mut plan = DistributionPlan::default();
    for reward in rewards {
        let next = plan.total.saturating_add(reward.amount);
        if next > available {
            return Err(MintgateError::BudgetExceeded { requested: next, available });
        }
        plan.total = next;
        plan.payouts.push(*reward);
    }
    Ok(plan)
}

/// Pay `amount` to every recipient, with strict accounting.
pub fn plan_fixed_award(
    recipients: &[AccountId],
    amount: Balance,
    available: Balance,
) -> Result<DistributionPlan, MintgateError> {
    let declared = amount
        .checked_mul(recipients.len() as Balance)
        .unwrap_or(Balance::MAX);
    let rewards: Vec<Reward> = recipients.iter().map(|a| Reward::new(*a, amount)).collect();
    plan_strict(&rewards, declared, available)
}
