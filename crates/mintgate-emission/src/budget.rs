//! Rate-based emission budget.
//!
//! available(t) = min((t − last_claim) × rate, cap), or 0 if the clock is ahead of t.
//!
//! Settling a claim of `c` units advances the clock by ⌈c / rate⌉ seconds:
//!
//!   unsaturated (available < cap):  last_claim += ⌈c / rate⌉
//!   saturated   (available ≥ cap):  last_claim  = t − ⌊cap / rate⌋ + ⌈c / rate⌉
//!
//! In the saturated case only the time needed to regenerate the cap counts as
//! banked, so an idle channel never holds more than `cap` of backlog. The new
//! clock never passes `t` and never moves backwards.

use mintgate_core::error::MintgateError;
use mintgate_core::records::EmissionState;
use mintgate_core::types::{Balance, Timestamp};
use tracing::debug;

/// Units a channel could mint at `now`.
pub fn mintable(last_claim: Timestamp, rate_per_second: Balance, cap: Balance, now: Timestamp) -> Balance {
    if last_claim > now {
        return 0;
    }
    let elapsed = (now as i128 - last_claim as i128) as u128;
    elapsed.saturating_mul(rate_per_second).min(cap)
}

/// The clock value after settling `claimed` units against a window that
/// offered `available` units at `now`.
pub fn advanced_clock(
    state: &EmissionState,
    available: Balance,
    claimed: Balance,
    now: Timestamp,
) -> Result<Timestamp, MintgateError> {
    if claimed == 0 {
        return Ok(state.last_claim);
    }
    let rate = state.rate_per_second;
    if rate == 0 {
        return Err(MintgateError::NothingToClaim);
    }
    let consumed = to_secs(claimed.div_ceil(rate))?;

    let next = if available >= state.cap {
        let banked = to_secs(state.cap / rate)?;
        now.checked_sub(banked)
            .and_then(|t| t.checked_add(consumed))
            .ok_or(MintgateError::ArithmeticOverflow)?
    } else {
        state
            .last_claim
            .checked_add(consumed)
            .ok_or(MintgateError::ArithmeticOverflow)?
    };

    Ok(next.min(now).max(state.last_claim))
}

fn to_secs(secs: u128) -> Result<Timestamp, MintgateError> {
    Timestamp::try_from(secs).map_err(|_| MintgateError::ArithmeticOverflow)
}

// ── ClaimWindow ───────────────────────────────────────────────────────────────

/// Snapshot of a channel's budget taken once at the start of a claim.
///
/// Every check and the final settlement use the same `available` and `now`,
/// so the budget cannot shift underneath a claim in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimWindow {
    pub available: Balance,
    pub now: Timestamp,
}

impl ClaimWindow {
    /// Open a window at `now`. Fails with `NothingToClaim` on an empty budget.
    pub fn open(state: &EmissionState, now: Timestamp) -> Result<Self, MintgateError> {
        let available = mintable(state.last_claim, state.rate_per_second, state.cap, now);
        if available == 0 {
            return Err(MintgateError::NothingToClaim);
        }
        Ok(Self { available, now })
    }

    pub fn ensure_covers(&self, requested: Balance) -> Result<(), MintgateError> {
        if requested > self.available {
            return Err(MintgateError::BudgetExceeded {
                requested,
                available: self.available,
            });
        }
        Ok(())
    }

    /// Debit `claimed` units from the channel by moving its clock forward.
    pub fn settle(&self, state: &mut EmissionState, claimed: Balance) -> Result<(), MintgateError> {
        self.ensure_covers(claimed)?;
        let next = advanced_clock(state, self.available, claimed, self.now)?;
        debug!(
            claimed,
            available = self.available,
            from = state.last_claim,
            to = next,
            "emission clock advanced"
        );
        state.last_claim = next;
        Ok(())
    }
}

/// Claim exactly `amount` units at `now`.
pub fn claim(state: &mut EmissionState, amount: Balance, now: Timestamp) -> Result<(), MintgateError> {
    let window = ClaimWindow::open(state, now)?;
    window.settle(state, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn channel(rate: Balance, cap: Balance, last: Timestamp) -> EmissionState {
        EmissionState::new(rate, cap, last)
    }

    #[test]
    fn accrues_linearly_below_cap() {
        let s = channel(10, 1_000_000, 0);
        assert_eq!(mintable(s.last_claim, s.rate_per_second, s.cap, 50), 500);
    }

    #[test]
    fn saturates_at_cap() {
        let s = channel(10, 1_000_000, 0);
        assert_eq!(mintable(0, 10, 1_000_000, 100_000), 1_000_000);
        assert_eq!(mintable(0, 10, 1_000_000, 200_000), 1_000_000);
        assert_eq!(mintable(s.last_claim, s.rate_per_second, s.cap, i64::MAX), 1_000_000);
    }

    #[test]
    fn clock_ahead_of_now_yields_zero() {
        assert_eq!(mintable(100, 10, 1_000, 99), 0);
    }

    #[test]
    fn extreme_clock_span_does_not_overflow() {
        assert_eq!(mintable(i64::MIN, u128::MAX, 7, i64::MAX), 7);
    }

    #[test]
    fn unsaturated_claim_advances_additively() {
        let mut s = channel(10, 1_000_000, 0);
        claim(&mut s, 500, 50).unwrap();
        assert_eq!(s.last_claim, 50);
        assert_eq!(mintable(s.last_claim, 10, 1_000_000, 50), 0);
    }

    #[test]
    fn partial_claim_leaves_remainder() {
        let mut s = channel(10, 1_000_000, 0);
        claim(&mut s, 200, 50).unwrap();
        assert_eq!(s.last_claim, 20);
        assert_eq!(mintable(s.last_claim, 10, 1_000_000, 50), 300);
    }

    #[test]
    fn saturated_claim_rebases_on_cap() {
        // Idle for 200_000s at 10/s with a 1_000_000 cap: only 100_000s are banked.
        let mut s = channel(10, 1_000_000, 0);
        claim(&mut s, 400_000, 200_000).unwrap();
        assert_eq!(s.last_claim, 200_000 - 100_000 + 40_000);
        assert_eq!(mintable(s.last_claim, 10, 1_000_000, 200_000), 600_000);
    }

    #[test]
    fn full_saturated_claim_empties_channel() {
        let mut s = channel(10, 1_000_000, 0);
        claim(&mut s, 1_000_000, 500_000).unwrap();
        assert_eq!(s.last_claim, 500_000);
    }

    #[test]
    fn sub_rate_claims_still_consume_time() {
        let mut s = channel(10, 1_000, 0);
        claim(&mut s, 9, 5).unwrap();
        assert_eq!(s.last_claim, 1);
        claim(&mut s, 9, 5).unwrap();
        assert_eq!(s.last_claim, 2);
    }

    #[test]
    fn empty_window_is_nothing_to_claim() {
        let mut s = channel(10, 1_000, 7);
        assert!(matches!(claim(&mut s, 1, 7), Err(MintgateError::NothingToClaim)));
        let mut zero_rate = channel(0, 1_000, 0);
        assert!(matches!(claim(&mut zero_rate, 1, 1_000), Err(MintgateError::NothingToClaim)));
    }

    #[test]
    fn over_request_is_budget_exceeded() {
        let mut s = channel(10, 1_000, 0);
        let err = claim(&mut s, 101, 10).unwrap_err();
        assert!(matches!(
            err,
            MintgateError::BudgetExceeded { requested: 101, available: 100 }
        ));
        assert_eq!(s.last_claim, 0, "failed claim must not move the clock");
    }

    #[test]
    fn zero_claim_keeps_clock() {
        let s = channel(10, 1_000, 3);
        assert_eq!(advanced_clock(&s, 70, 0, 10).unwrap(), 3);
    }

    #[test]
    fn clock_is_monotonic_and_never_passes_now() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let rate: Balance = rng.gen_range(1..50);
            let cap: Balance = rng.gen_range(1..5_000);
            let mut s = channel(rate, cap, 0);
            let mut now = 0i64;
            for _ in 0..50 {
                now += rng.gen_range(0..400);
                let before = s.last_claim;
                if let Ok(w) = ClaimWindow::open(&s, now) {
                    let amount = rng.gen_range(0..=w.available);
                    w.settle(&mut s, amount).unwrap();
                }
                assert!(s.last_claim >= before);
                assert!(s.last_claim <= now);
            }
        }
    }

    #[test]
    fn many_small_claims_never_beat_one_claim() {
        // Without the cap in play, the total minted over [0, T] is bounded by T × rate.
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let rate: Balance = rng.gen_range(1..100);
            let mut s = channel(rate, Balance::MAX, 0);
            let mut now = 0i64;
            let mut minted: Balance = 0;
            for _ in 0..60 {
                now += rng.gen_range(0..30);
                if let Ok(w) = ClaimWindow::open(&s, now) {
                    let amount = rng.gen_range(1..=w.available);
                    w.settle(&mut s, amount).unwrap();
                    minted += amount;
                }
            }
            assert!(
                minted <= now as Balance * rate,
                "minted {minted} over {now}s at {rate}/s"
            );
        }
    }
}
