//! mintgate-emission
//!
//! Time-budgeted emission arithmetic. A channel accrues `rate_per_second`
//! units for every second since its clock, up to `cap`. Claims move the
//! clock forward by the time equivalent of what was actually minted, so the
//! same elapsed window can never be spent twice.
//!
//! Everything here is pure: callers own the `EmissionState` and decide when
//! a claim commits. The batch planners decide which rewards fit a budget
//! without touching any balances.

pub mod budget;
pub mod distribution;

pub use budget::{advanced_clock, claim, mintable, ClaimWindow};
pub use distribution::{plan_best_effort, plan_fixed_award, plan_strict, DistributionPlan};
