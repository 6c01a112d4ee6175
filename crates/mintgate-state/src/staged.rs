use std::collections::BTreeMap;

use mintgate_core::error::MintgateError;
use mintgate_core::event::{EventRecord, LedgerEvent};
use mintgate_core::permission::Permission;
use mintgate_core::records::{
    AwardConfig, EmissionChannel, EmissionState, FeeSchedule, PermissionLock, StakingConfig,
    TokenInfo,
};
use mintgate_core::types::{AccountId, Balance, Timestamp};
use tracing::debug;

use crate::db::{
    allowance_key, encode, fee_exempt_key, fee_pair_key, grant_key, StateDb, WriteSet,
    META_AWARDS, META_EVENT_SEQ, META_FEES, META_OWNER, META_STAKING, META_TOKEN,
    META_TOTAL_SUPPLY,
};

/// All state changes made by one call, before commit.
///
/// Reads fall through to the database for anything not yet staged, so later
/// steps of a call observe earlier ones. Dropping the value discards the call.
pub struct StagedMutations<'a> {
    db: &'a StateDb,
    balances: BTreeMap<AccountId, Balance>,
    allowances: BTreeMap<(AccountId, AccountId), Balance>,
    grants: BTreeMap<(AccountId, Permission), bool>,
    locks: BTreeMap<Permission, PermissionLock>,
    emission: BTreeMap<EmissionChannel, EmissionState>,
    fee_exempt: BTreeMap<AccountId, bool>,
    fee_pairs: BTreeMap<AccountId, bool>,
    owner: Option<AccountId>,
    total_supply: Option<Balance>,
    staking: Option<StakingConfig>,
    fees: Option<FeeSchedule>,
    awards: Option<AwardConfig>,
    token: Option<TokenInfo>,
    events: Vec<LedgerEvent>,
}

impl<'a> StagedMutations<'a> {
    pub fn new(db: &'a StateDb) -> Self {
        Self {
            db,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            grants: BTreeMap::new(),
            locks: BTreeMap::new(),
            emission: BTreeMap::new(),
            fee_exempt: BTreeMap::new(),
            fee_pairs: BTreeMap::new(),
            owner: None,
            total_supply: None,
            staking: None,
            fees: None,
            awards: None,
            token: None,
            events: Vec::new(),
        }
    }

    // ── Balances ──────────────────────────────────────────────────────────────

    pub fn balance(&self, account: &AccountId) -> Result<Balance, MintgateError> {
        match self.balances.get(account) {
            Some(b) => Ok(*b),
            None => self.db.get_balance(account),
        }
    }

    pub fn set_balance(&mut self, account: AccountId, balance: Balance) {
        self.balances.insert(account, balance);
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Result<Balance, MintgateError> {
        match self.allowances.get(&(*owner, *spender)) {
            Some(a) => Ok(*a),
            None => self.db.get_allowance(owner, spender),
        }
    }

    pub fn set_allowance(&mut self, owner: AccountId, spender: AccountId, amount: Balance) {
        self.allowances.insert((owner, spender), amount);
    }

    pub fn total_supply(&self) -> Result<Balance, MintgateError> {
        match self.total_supply {
            Some(s) => Ok(s),
            None => self.db.total_supply(),
        }
    }

    pub fn set_total_supply(&mut self, supply: Balance) {
        self.total_supply = Some(supply);
    }

    // ── Authorization ─────────────────────────────────────────────────────────

    pub fn owner(&self) -> Result<AccountId, MintgateError> {
        match self.owner {
            Some(o) => Ok(o),
            None => self.db.get_owner(),
        }
    }

    pub fn set_owner(&mut self, owner: AccountId) {
        self.owner = Some(owner);
    }

    pub fn has_grant(&self, account: &AccountId, permission: Permission) -> Result<bool, MintgateError> {
        match self.grants.get(&(*account, permission)) {
            Some(g) => Ok(*g),
            None => self.db.has_grant(account, permission),
        }
    }

    pub fn set_grant(&mut self, account: AccountId, permission: Permission, granted: bool) {
        self.grants.insert((account, permission), granted);
    }

    pub fn lock(&self, permission: Permission) -> Result<PermissionLock, MintgateError> {
        match self.locks.get(&permission) {
            Some(l) => Ok(*l),
            None => self.db.get_lock(permission),
        }
    }

    pub fn set_lock(&mut self, permission: Permission, lock: PermissionLock) {
        self.locks.insert(permission, lock);
    }

    // ── Emission ──────────────────────────────────────────────────────────────

    pub fn emission(&self, channel: EmissionChannel) -> Result<EmissionState, MintgateError> {
        match self.emission.get(&channel) {
            Some(s) => Ok(*s),
            None => self.db.get_emission(channel),
        }
    }

    pub fn set_emission(&mut self, channel: EmissionChannel, state: EmissionState) {
        self.emission.insert(channel, state);
    }

    pub fn staking(&self) -> Result<StakingConfig, MintgateError> {
        match self.staking {
            Some(s) => Ok(s),
            None => self.db.get_staking(),
        }
    }

    pub fn set_staking(&mut self, config: StakingConfig) {
        self.staking = Some(config);
    }

    pub fn awards(&self) -> Result<AwardConfig, MintgateError> {
        match self.awards {
            Some(a) => Ok(a),
            None => self.db.get_awards(),
        }
    }

    pub fn set_awards(&mut self, awards: AwardConfig) {
        self.awards = Some(awards);
    }

    // ── Fees ──────────────────────────────────────────────────────────────────

    pub fn fees(&self) -> Result<FeeSchedule, MintgateError> {
        match self.fees {
            Some(f) => Ok(f),
            None => self.db.get_fees(),
        }
    }

    pub fn set_fees(&mut self, fees: FeeSchedule) {
        self.fees = Some(fees);
    }

    pub fn is_fee_exempt(&self, account: &AccountId) -> Result<bool, MintgateError> {
        match self.fee_exempt.get(account) {
            Some(e) => Ok(*e),
            None => self.db.is_fee_exempt(account),
        }
    }

    pub fn set_fee_exempt(&mut self, account: AccountId, exempt: bool) {
        self.fee_exempt.insert(account, exempt);
    }

    pub fn is_fee_pair(&self, account: &AccountId) -> Result<bool, MintgateError> {
        match self.fee_pairs.get(account) {
            Some(p) => Ok(*p),
            None => self.db.is_fee_pair(account),
        }
    }

    pub fn set_fee_pair(&mut self, account: AccountId, is_pair: bool) {
        self.fee_pairs.insert(account, is_pair);
    }

    pub fn set_token_info(&mut self, token: TokenInfo) {
        self.token = Some(token);
    }

    // ── Events ────────────────────────────────────────────────────────────────

    pub fn emit(&mut self, event: LedgerEvent) {
        debug!(?event, "staged event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    // ── Commit ────────────────────────────────────────────────────────────────

    /// Encode every staged change into a write set. Events are numbered from
    /// the database's next sequence number and stamped with `now`.
    pub fn into_write_set(self, now: Timestamp) -> Result<(WriteSet, Vec<EventRecord>), MintgateError> {
        let mut w = WriteSet::default();

        for (account, balance) in &self.balances {
            w.balances.push((account.as_bytes().to_vec(), Some(encode(balance)?)));
        }
        for ((owner, spender), amount) in &self.allowances {
            let value = if *amount == 0 { None } else { Some(encode(amount)?) };
            w.allowances.push((allowance_key(owner, spender), value));
        }
        for ((account, permission), granted) in &self.grants {
            w.grants.push((grant_key(account, *permission), granted.then(Vec::new)));
        }
        for (permission, lock) in &self.locks {
            w.locks.push((vec![permission.id()], Some(encode(lock)?)));
        }
        for (channel, state) in &self.emission {
            w.emission.push((channel.key().as_bytes().to_vec(), Some(encode(state)?)));
        }
        for (account, exempt) in &self.fee_exempt {
            w.fees.push((fee_exempt_key(account), exempt.then(Vec::new)));
        }
        for (account, is_pair) in &self.fee_pairs {
            w.fees.push((fee_pair_key(account), is_pair.then(Vec::new)));
        }

        let mut meta = |key: &str, value: Vec<u8>| w.meta.push((key.as_bytes().to_vec(), Some(value)));
        if let Some(owner) = &self.owner {
            meta(META_OWNER, encode(owner)?);
        }
        if let Some(supply) = &self.total_supply {
            meta(META_TOTAL_SUPPLY, encode(supply)?);
        }
        if let Some(staking) = &self.staking {
            meta(META_STAKING, encode(staking)?);
        }
        if let Some(fees) = &self.fees {
            meta(META_FEES, encode(fees)?);
        }
        if let Some(awards) = &self.awards {
            meta(META_AWARDS, encode(awards)?);
        }
        if let Some(token) = &self.token {
            meta(META_TOKEN, encode(token)?);
        }

        let mut records = Vec::with_capacity(self.events.len());
        if !self.events.is_empty() {
            let mut seq = self.db.next_event_seq()?;
            for event in self.events {
                let record = EventRecord { seq, at: now, event };
                w.events.push((seq.to_be_bytes().to_vec(), Some(encode(&record)?)));
                records.push(record);
                seq += 1;
            }
            meta(META_EVENT_SEQ, encode(&seq)?);
        }

        Ok((w, records))
    }

    /// Commit everything staged. Returns the numbered events.
    pub fn commit(self, now: Timestamp) -> Result<Vec<EventRecord>, MintgateError> {
        let db = self.db;
        let (writes, records) = self.into_write_set(now)?;
        db.commit(&writes)?;
        Ok(records)
    }
}
