//! mintgate-state
//!
//! Persistent ledger state and the state transition engine.
//!
//! Every call is staged in memory against a read-through view of the
//! database and committed in one sled transaction only if the whole call
//! succeeds.

pub mod auth;
pub mod db;
pub mod engine;
pub mod ledger;
pub mod minting;
pub mod query;
pub mod staged;

pub use auth::{LockPolicy, TimedLocks};
pub use db::StateDb;
pub use engine::{Receipt, StateEngine};
pub use query::LedgerQuery;
pub use staged::StagedMutations;
