use mintgate_core::error::MintgateError;
use mintgate_core::permission::Permission;
use mintgate_core::records::{EmissionChannel, EmissionState, PermissionLock, StakingConfig};
use mintgate_core::types::{AccountId, Balance, Timestamp};
use mintgate_emission::mintable;

use crate::db::StateDb;

/// Read-only views over committed ledger state.
pub struct LedgerQuery<'a> {
    db: &'a StateDb,
}

impl<'a> LedgerQuery<'a> {
    pub fn new(db: &'a StateDb) -> Self {
        Self { db }
    }

    pub fn balance(&self, account: &AccountId) -> Result<Balance, MintgateError> {
        self.db.get_balance(account)
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Result<Balance, MintgateError> {
        self.db.get_allowance(owner, spender)
    }

    pub fn total_supply(&self) -> Result<Balance, MintgateError> {
        self.db.total_supply()
    }

    pub fn owner(&self) -> Result<AccountId, MintgateError> {
        self.db.get_owner()
    }

    pub fn has_permission(&self, account: &AccountId, permission: Permission) -> Result<bool, MintgateError> {
        self.db.has_grant(account, permission)
    }

    /// Every permission `account` currently holds, in id order.
    pub fn permissions_of(&self, account: &AccountId) -> Result<Vec<Permission>, MintgateError> {
        let mut held = Vec::new();
        for permission in Permission::ALL {
            if self.db.has_grant(account, permission)? {
                held.push(permission);
            }
        }
        Ok(held)
    }

    pub fn lock(&self, permission: Permission) -> Result<PermissionLock, MintgateError> {
        self.db.get_lock(permission)
    }

    pub fn emission(&self, channel: EmissionChannel) -> Result<EmissionState, MintgateError> {
        self.db.get_emission(channel)
    }

    pub fn staking(&self) -> Result<StakingConfig, MintgateError> {
        self.db.get_staking()
    }

    /// Units `channel` could mint if claimed at `now`.
    pub fn mintable(&self, channel: EmissionChannel, now: Timestamp) -> Result<Balance, MintgateError> {
        let s = self.db.get_emission(channel)?;
        Ok(mintable(s.last_claim, s.rate_per_second, s.cap, now))
    }

    /// Human-readable summary of a permission's lock.
    pub fn describe_lock(&self, permission: Permission, now: Timestamp) -> Result<String, MintgateError> {
        let lock = self.db.get_lock(permission)?;
        let status = if !lock.locked {
            "unlocked".to_string()
        } else if now > lock.expiry {
            format!("locked, expired at {} (unlock to re-enable)", lock.expiry)
        } else {
            let secs_remaining = lock.expiry - now;
            format!("locked until {} ({}s remaining)", lock.expiry, secs_remaining)
        };
        Ok(format!("{} [{}] {}", permission, permission.id(), status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staged::StagedMutations;

    fn temp_db(name: &str) -> StateDb {
        let dir = std::env::temp_dir().join(format!("mintgate_query_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        StateDb::open(&dir).expect("open temp db")
    }

    #[test]
    fn describe_lock_tracks_expiry() {
        let db = temp_db("describe_lock");
        let mut staged = StagedMutations::new(&db);
        staged.set_lock(Permission::Emission, PermissionLock { locked: true, expiry: 100 });
        staged.commit(0).unwrap();

        let q = LedgerQuery::new(&db);
        assert_eq!(q.describe_lock(Permission::Authorize, 0).unwrap(), "AUTHORIZE [0] unlocked");
        assert_eq!(
            q.describe_lock(Permission::Emission, 40).unwrap(),
            "EMISSION [4] locked until 100 (60s remaining)"
        );
        assert!(q.describe_lock(Permission::Emission, 101).unwrap().contains("expired"));
    }

    #[test]
    fn mintable_reads_committed_clock() {
        let db = temp_db("mintable");
        let mut staged = StagedMutations::new(&db);
        staged.set_emission(EmissionChannel::Game, EmissionState::new(3, 100, 10));
        staged.commit(0).unwrap();

        let q = LedgerQuery::new(&db);
        assert_eq!(q.mintable(EmissionChannel::Game, 20).unwrap(), 30);
        assert_eq!(q.mintable(EmissionChannel::Game, 5).unwrap(), 0);
        assert!(matches!(
            q.mintable(EmissionChannel::Staking, 20),
            Err(MintgateError::NotInitialized)
        ));
    }

    #[test]
    fn permissions_of_lists_grants_in_order() {
        let db = temp_db("permissions_of");
        let alice = AccountId::derive("alice");
        let mut staged = StagedMutations::new(&db);
        staged.set_grant(alice, Permission::GameEmission, true);
        staged.set_grant(alice, Permission::Authorize, true);
        staged.commit(0).unwrap();

        let q = LedgerQuery::new(&db);
        assert_eq!(
            q.permissions_of(&alice).unwrap(),
            vec![Permission::Authorize, Permission::GameEmission]
        );
        assert!(q.permissions_of(&AccountId::derive("bob")).unwrap().is_empty());
    }
}
