use mintgate_core::error::MintgateError;
use mintgate_core::event::EventRecord;
use mintgate_core::permission::Permission;
use mintgate_core::records::{
    AwardConfig, EmissionChannel, EmissionState, FeeSchedule, PermissionLock, StakingConfig,
    TokenInfo,
};
use mintgate_core::types::{AccountId, Balance};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::transaction::{TransactionError, TransactionResult, TransactionalTree, UnabortableTransactionError};
use sled::Transactional;
use std::path::Path;

// ── Meta keys ─────────────────────────────────────────────────────────────────

pub(crate) const META_OWNER: &str = "owner";
pub(crate) const META_TOTAL_SUPPLY: &str = "total_supply";
pub(crate) const META_STAKING: &str = "staking";
pub(crate) const META_FEES: &str = "fee_schedule";
pub(crate) const META_AWARDS: &str = "awards";
pub(crate) const META_TOKEN: &str = "token";
pub(crate) const META_EVENT_SEQ: &str = "event_seq";

// ── Key layout ────────────────────────────────────────────────────────────────

pub(crate) fn allowance_key(owner: &AccountId, spender: &AccountId) -> Vec<u8> {
    let mut k = Vec::with_capacity(64);
    k.extend_from_slice(owner.as_bytes());
    k.extend_from_slice(spender.as_bytes());
    k
}

pub(crate) fn grant_key(account: &AccountId, permission: Permission) -> Vec<u8> {
    let mut k = Vec::with_capacity(33);
    k.extend_from_slice(account.as_bytes());
    k.push(permission.id());
    k
}

pub(crate) fn fee_exempt_key(account: &AccountId) -> Vec<u8> {
    let mut k = vec![b'e'];
    k.extend_from_slice(account.as_bytes());
    k
}

pub(crate) fn fee_pair_key(account: &AccountId) -> Vec<u8> {
    let mut k = vec![b'p'];
    k.extend_from_slice(account.as_bytes());
    k
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, MintgateError> {
    bincode::serialize(value).map_err(|e| MintgateError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, MintgateError> {
    bincode::deserialize(bytes).map_err(|e| MintgateError::Serialization(e.to_string()))
}

fn storage(e: sled::Error) -> MintgateError {
    MintgateError::Storage(e.to_string())
}

// ── WriteSet ──────────────────────────────────────────────────────────────────

/// Encoded writes for one tree. `None` deletes the key.
pub type TreeWrites = Vec<(Vec<u8>, Option<Vec<u8>>)>;

/// Everything one call changes, ready to commit atomically.
#[derive(Debug, Default)]
pub struct WriteSet {
    pub balances: TreeWrites,
    pub allowances: TreeWrites,
    pub grants: TreeWrites,
    pub locks: TreeWrites,
    pub emission: TreeWrites,
    pub fees: TreeWrites,
    pub meta: TreeWrites,
    pub events: TreeWrites,
}

fn apply_writes(tree: &TransactionalTree, writes: &TreeWrites) -> Result<(), UnabortableTransactionError> {
    for (key, value) in writes {
        match value {
            Some(v) => {
                tree.insert(key.as_slice(), v.as_slice())?;
            }
            None => {
                tree.remove(key.as_slice())?;
            }
        }
    }
    Ok(())
}

// ── StateDb ───────────────────────────────────────────────────────────────────

/// Persistent ledger state backed by sled.
///
/// Named trees:
///   balances    — AccountId bytes             → bincode(Balance)
///   allowances  — owner ‖ spender             → bincode(Balance)
///   grants      — AccountId ‖ permission id   → [] (membership set)
///   locks       — permission id               → bincode(PermissionLock)
///   emission    — channel key                 → bincode(EmissionState)
///   fees        — 'e'|'p' ‖ AccountId         → [] (exempt / pair sets)
///   meta        — utf8 key                    → bincode(value)
///   events      — seq (u64 BE)                → bincode(EventRecord)
pub struct StateDb {
    _db: sled::Db,
    balances: sled::Tree,
    allowances: sled::Tree,
    grants: sled::Tree,
    locks: sled::Tree,
    emission: sled::Tree,
    fees: sled::Tree,
    meta: sled::Tree,
    events: sled::Tree,
}

impl StateDb {
    /// Open or create the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MintgateError> {
        let db = sled::open(path).map_err(storage)?;
        let balances   = db.open_tree("balances").map_err(storage)?;
        let allowances = db.open_tree("allowances").map_err(storage)?;
        let grants     = db.open_tree("grants").map_err(storage)?;
        let locks      = db.open_tree("locks").map_err(storage)?;
        let emission   = db.open_tree("emission").map_err(storage)?;
        let fees       = db.open_tree("fees").map_err(storage)?;
        let meta       = db.open_tree("meta").map_err(storage)?;
        let events     = db.open_tree("events").map_err(storage)?;
        Ok(Self { _db: db, balances, allowances, grants, locks, emission, fees, meta, events })
    }

    fn get<T: DeserializeOwned>(tree: &sled::Tree, key: &[u8]) -> Result<Option<T>, MintgateError> {
        match tree.get(key).map_err(storage)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn get_meta<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, MintgateError> {
        Self::get(&self.meta, key.as_bytes())
    }

    /// True once genesis has written an owner.
    pub fn is_initialized(&self) -> Result<bool, MintgateError> {
        self.meta.contains_key(META_OWNER.as_bytes()).map_err(storage)
    }

    // ── Balances ──────────────────────────────────────────────────────────────

    pub fn get_balance(&self, account: &AccountId) -> Result<Balance, MintgateError> {
        Ok(Self::get(&self.balances, account.as_bytes())?.unwrap_or(0))
    }

    pub fn get_allowance(&self, owner: &AccountId, spender: &AccountId) -> Result<Balance, MintgateError> {
        Ok(Self::get(&self.allowances, &allowance_key(owner, spender))?.unwrap_or(0))
    }

    /// Sum of every stored balance.
    pub fn sum_balances(&self) -> Result<Balance, MintgateError> {
        let mut total: Balance = 0;
        for item in self.balances.iter() {
            let (_, bytes) = item.map_err(storage)?;
            let b: Balance = decode(&bytes)?;
            total = total.checked_add(b).ok_or(MintgateError::ArithmeticOverflow)?;
        }
        Ok(total)
    }

    pub fn total_supply(&self) -> Result<Balance, MintgateError> {
        Ok(self.get_meta(META_TOTAL_SUPPLY)?.unwrap_or(0))
    }

    // ── Authorization ─────────────────────────────────────────────────────────

    pub fn get_owner(&self) -> Result<AccountId, MintgateError> {
        self.get_meta(META_OWNER)?.ok_or(MintgateError::NotInitialized)
    }

    pub fn has_grant(&self, account: &AccountId, permission: Permission) -> Result<bool, MintgateError> {
        self.grants.contains_key(grant_key(account, permission)).map_err(storage)
    }

    pub fn get_lock(&self, permission: Permission) -> Result<PermissionLock, MintgateError> {
        Ok(Self::get(&self.locks, &[permission.id()])?.unwrap_or_default())
    }

    // ── Emission ──────────────────────────────────────────────────────────────

    pub fn get_emission(&self, channel: EmissionChannel) -> Result<EmissionState, MintgateError> {
        Self::get(&self.emission, channel.key().as_bytes())?.ok_or(MintgateError::NotInitialized)
    }

    pub fn get_staking(&self) -> Result<StakingConfig, MintgateError> {
        Ok(self.get_meta(META_STAKING)?.unwrap_or_default())
    }

    pub fn get_awards(&self) -> Result<AwardConfig, MintgateError> {
        self.get_meta(META_AWARDS)?.ok_or(MintgateError::NotInitialized)
    }

    // ── Fees ──────────────────────────────────────────────────────────────────

    pub fn get_fees(&self) -> Result<FeeSchedule, MintgateError> {
        Ok(self.get_meta(META_FEES)?.unwrap_or_default())
    }

    pub fn is_fee_exempt(&self, account: &AccountId) -> Result<bool, MintgateError> {
        self.fees.contains_key(fee_exempt_key(account)).map_err(storage)
    }

    pub fn is_fee_pair(&self, account: &AccountId) -> Result<bool, MintgateError> {
        self.fees.contains_key(fee_pair_key(account)).map_err(storage)
    }

    // ── Token / events ────────────────────────────────────────────────────────

    pub fn get_token_info(&self) -> Result<TokenInfo, MintgateError> {
        self.get_meta(META_TOKEN)?.ok_or(MintgateError::NotInitialized)
    }

    /// Sequence number the next event will receive.
    pub fn next_event_seq(&self) -> Result<u64, MintgateError> {
        Ok(self.get_meta(META_EVENT_SEQ)?.unwrap_or(0))
    }

    /// Audit events with `seq >= from`, in order.
    pub fn events_since(&self, from: u64) -> Result<Vec<EventRecord>, MintgateError> {
        let mut out = Vec::new();
        for item in self.events.range(from.to_be_bytes()..) {
            let (_, bytes) = item.map_err(storage)?;
            out.push(decode(&bytes)?);
        }
        Ok(out)
    }

    // ── Commit ────────────────────────────────────────────────────────────────

    /// Apply a write set across all trees in one transaction.
    pub fn commit(&self, writes: &WriteSet) -> Result<(), MintgateError> {
        let result: TransactionResult<(), MintgateError> = (
            &self.balances,
            &self.allowances,
            &self.grants,
            &self.locks,
            &self.emission,
            &self.fees,
            &self.meta,
            &self.events,
        )
            .transaction(|(balances, allowances, grants, locks, emission, fees, meta, events)| {
                apply_writes(balances, &writes.balances)?;
                apply_writes(allowances, &writes.allowances)?;
                apply_writes(grants, &writes.grants)?;
                apply_writes(locks, &writes.locks)?;
                apply_writes(emission, &writes.emission)?;
                apply_writes(fees, &writes.fees)?;
                apply_writes(meta, &writes.meta)?;
                apply_writes(events, &writes.events)?;
                Ok(())
            });
        result.map_err(|e| match e {
            TransactionError::Abort(e) => e,
            TransactionError::Storage(e) => storage(e),
        })
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), MintgateError> {
        self._db.flush().map_err(storage)?;
        Ok(())
    }
}
