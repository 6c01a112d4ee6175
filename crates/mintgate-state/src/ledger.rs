//! Balance primitives: mint, debit, credit, and the ordinary transfer path.

use mintgate_core::error::MintgateError;
use mintgate_core::event::LedgerEvent;
use mintgate_core::types::{AccountId, Balance, Timestamp};

use crate::minting;
use crate::staged::StagedMutations;

/// Create `amount` new units in `to`. The only place supply grows.
pub fn mint(staged: &mut StagedMutations<'_>, to: AccountId, amount: Balance) -> Result<(), MintgateError> {
    if to.is_null() {
        return Err(MintgateError::ZeroAddress);
    }
    let supply = staged
        .total_supply()?
        .checked_add(amount)
        .ok_or(MintgateError::ArithmeticOverflow)?;
    credit(staged, to, amount)?;
    staged.set_total_supply(supply);
    staged.emit(LedgerEvent::mint(to, amount));
    Ok(())
}

pub fn debit(staged: &mut StagedMutations<'_>, from: AccountId, amount: Balance) -> Result<(), MintgateError> {
    let have = staged.balance(&from)?;
    if have < amount {
        return Err(MintgateError::InsufficientBalance { need: amount, have });
    }
    staged.set_balance(from, have - amount);
    Ok(())
}

pub fn credit(staged: &mut StagedMutations<'_>, to: AccountId, amount: Balance) -> Result<(), MintgateError> {
    let next = staged
        .balance(&to)?
        .checked_add(amount)
        .ok_or(MintgateError::ArithmeticOverflow)?;
    staged.set_balance(to, next);
    Ok(())
}

/// Move `amount` from `from` to `to`, taking the transfer fee if one applies.
///
/// Pending staking emission is claimed first, as its own step, before any
/// balance of this transfer is read.
pub fn transfer(
    staged: &mut StagedMutations<'_>,
    from: AccountId,
    to: AccountId,
    amount: Balance,
    now: Timestamp,
) -> Result<(), MintgateError> {
    if amount == 0 {
        return Err(MintgateError::AmountZero);
    }
    if from.is_null() || to.is_null() {
        return Err(MintgateError::ZeroAddress);
    }

    minting::claim_staking_if_due(staged, now)?;

    let fee = transfer_fee(staged, &from, &to, amount)?;
    debit(staged, from, amount)?;
    credit(staged, to, amount - fee)?;
    staged.emit(LedgerEvent::Transfer { from, to, amount: amount - fee });

    if fee > 0 {
        if let Some(recipient) = staged.fees()?.recipient {
            credit(staged, recipient, fee)?;
            staged.emit(LedgerEvent::Transfer { from, to: recipient, amount: fee });
        }
    }
    Ok(())
}

/// Fee charged on a transfer: only when one side is a registered fee pair
/// and neither side is exempt.
fn transfer_fee(
    staged: &StagedMutations<'_>,
    from: &AccountId,
    to: &AccountId,
    amount: Balance,
) -> Result<Balance, MintgateError> {
    let fees = staged.fees()?;
    if fees.percent == 0 || fees.recipient.is_none() {
        return Ok(0);
    }
    if staged.is_fee_exempt(from)? || staged.is_fee_exempt(to)? {
        return Ok(0);
    }
    if !(staged.is_fee_pair(from)? || staged.is_fee_pair(to)?) {
        return Ok(0);
    }
    Ok(fees.fee_for(amount))
}

pub fn approve(
    staged: &mut StagedMutations<'_>,
    owner: AccountId,
    spender: AccountId,
    amount: Balance,
) -> Result<(), MintgateError> {
    if spender.is_null() {
        return Err(MintgateError::ZeroAddress);
    }
    staged.set_allowance(owner, spender, amount);
    staged.emit(LedgerEvent::Approval { owner, spender, amount });
    Ok(())
}

/// Spend `spender`'s allowance over `from` and transfer.
pub fn transfer_from(
    staged: &mut StagedMutations<'_>,
    spender: AccountId,
    from: AccountId,
    to: AccountId,
    amount: Balance,
    now: Timestamp,
) -> Result<(), MintgateError> {
    let allowed = staged.allowance(&from, &spender)?;
    if allowed < amount {
        return Err(MintgateError::InsufficientAllowance { need: amount, have: allowed });
    }
    staged.set_allowance(from, spender, allowed - amount);
    transfer(staged, from, to, amount, now)
}
