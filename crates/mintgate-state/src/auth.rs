//! Named-permission authorization with lockable permissions.
//!
//! Every privileged call passes `authorized_for` before it stages anything.
//! A locked permission can be neither exercised nor granted/revoked until
//! its lock has expired and been explicitly cleared.

use mintgate_core::error::MintgateError;
use mintgate_core::event::LedgerEvent;
use mintgate_core::permission::Permission;
use mintgate_core::records::PermissionLock;
use mintgate_core::types::{AccountId, Timestamp};
use tracing::info;

use crate::staged::StagedMutations;

// ── LockPolicy ────────────────────────────────────────────────────────────────

/// Extension point for how permission locks are set and cleared.
///
/// The provided methods implement plain timed locks; deployments that need
/// something else (minimum durations, non-extendable locks) override them.
pub trait LockPolicy: Send + Sync {
    /// Expiry of a lock requested at `now` for `duration` seconds.
    fn lock_expiry(
        &self,
        _permission: Permission,
        now: Timestamp,
        duration: u64,
    ) -> Result<Timestamp, MintgateError> {
        Timestamp::try_from(duration)
            .ok()
            .and_then(|d| now.checked_add(d))
            .ok_or(MintgateError::ArithmeticOverflow)
    }

    /// Whether `lock` may be cleared at `now`. Only strictly after expiry.
    fn check_unlock(
        &self,
        permission: Permission,
        lock: &PermissionLock,
        now: Timestamp,
    ) -> Result<(), MintgateError> {
        if now > lock.expiry {
            Ok(())
        } else {
            Err(MintgateError::StillLocked { permission, expiry: lock.expiry })
        }
    }
}

/// The default policy: a lock lasts exactly the requested duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimedLocks;

impl LockPolicy for TimedLocks {}

// ── Checks ────────────────────────────────────────────────────────────────────

/// Gate for every privileged operation.
pub fn authorized_for(
    staged: &StagedMutations<'_>,
    caller: &AccountId,
    permission: Permission,
) -> Result<(), MintgateError> {
    ensure_unlocked(staged, permission)?;
    if !staged.has_grant(caller, permission)? {
        return Err(MintgateError::NotAuthorized(permission));
    }
    Ok(())
}

fn ensure_unlocked(staged: &StagedMutations<'_>, permission: Permission) -> Result<(), MintgateError> {
    if staged.lock(permission)?.is_active() {
        return Err(MintgateError::PermissionLocked(permission));
    }
    Ok(())
}

// ── Grants ────────────────────────────────────────────────────────────────────

/// Grant `permissions` to `account`. Grants already held are left alone.
pub fn grant(
    staged: &mut StagedMutations<'_>,
    caller: &AccountId,
    account: AccountId,
    permissions: &[Permission],
) -> Result<(), MintgateError> {
    authorized_for(staged, caller, Permission::Authorize)?;
    if account.is_null() {
        return Err(MintgateError::ZeroAddress);
    }
    for &permission in permissions {
        ensure_unlocked(staged, permission)?;
        if !staged.has_grant(&account, permission)? {
            staged.set_grant(account, permission, true);
            staged.emit(LedgerEvent::Granted { account, permission });
        }
    }
    Ok(())
}

/// Revoke `permissions` from `account`. The owner's grants are untouchable.
pub fn revoke(
    staged: &mut StagedMutations<'_>,
    caller: &AccountId,
    account: AccountId,
    permissions: &[Permission],
) -> Result<(), MintgateError> {
    if account == staged.owner()? {
        return Err(MintgateError::CannotRevokeOwner);
    }
    authorized_for(staged, caller, Permission::Unauthorize)?;
    for &permission in permissions {
        ensure_unlocked(staged, permission)?;
        if staged.has_grant(&account, permission)? {
            staged.set_grant(account, permission, false);
            staged.emit(LedgerEvent::Revoked { account, permission });
        }
    }
    Ok(())
}

/// Hand ownership and the full permission set to `new_owner`.
pub fn transfer_ownership(
    staged: &mut StagedMutations<'_>,
    caller: &AccountId,
    new_owner: AccountId,
) -> Result<(), MintgateError> {
    let previous = staged.owner()?;
    if *caller != previous {
        return Err(MintgateError::NotOwner);
    }
    if new_owner.is_null() {
        return Err(MintgateError::ZeroAddress);
    }
    if new_owner == previous {
        return Ok(());
    }

    for permission in Permission::ALL {
        if staged.has_grant(&previous, permission)? {
            staged.set_grant(previous, permission, false);
            staged.emit(LedgerEvent::Revoked { account: previous, permission });
        }
    }
    for permission in Permission::ALL {
        if !staged.has_grant(&new_owner, permission)? {
            staged.set_grant(new_owner, permission, true);
            staged.emit(LedgerEvent::Granted { account: new_owner, permission });
        }
    }
    staged.set_owner(new_owner);
    staged.emit(LedgerEvent::OwnershipTransferred { previous, new_owner });
    info!(%previous, %new_owner, "ownership transferred");
    Ok(())
}

// ── Locks ─────────────────────────────────────────────────────────────────────

pub fn lock_permission(
    staged: &mut StagedMutations<'_>,
    policy: &dyn LockPolicy,
    caller: &AccountId,
    permission: Permission,
    duration: u64,
    now: Timestamp,
) -> Result<(), MintgateError> {
    authorized_for(staged, caller, Permission::LockPermissions)?;
    let expiry = policy.lock_expiry(permission, now, duration)?;
    staged.set_lock(permission, PermissionLock { locked: true, expiry });
    staged.emit(LedgerEvent::PermissionLocked { permission, expiry });
    info!(%permission, expiry, "permission locked");
    Ok(())
}

/// Clear an expired lock. Open to any caller; a permission that is not
/// locked is left as is.
pub fn unlock_permission(
    staged: &mut StagedMutations<'_>,
    policy: &dyn LockPolicy,
    permission: Permission,
    now: Timestamp,
) -> Result<(), MintgateError> {
    let lock = staged.lock(permission)?;
    if !lock.is_active() {
        return Ok(());
    }
    policy.check_unlock(permission, &lock, now)?;
    staged.set_lock(permission, PermissionLock { locked: false, expiry: lock.expiry });
    staged.emit(LedgerEvent::PermissionUnlocked { permission });
    info!(%permission, "permission unlocked");
    Ok(())
}
