use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::MintgateError;

/// Token amount in base units (see `UNITS_PER_TOKEN`).
pub type Balance = u128;

/// Unix timestamp (seconds, UTC) supplied by the host for each call.
pub type Timestamp = i64;

// ── AccountId ────────────────────────────────────────────────────────────────

/// 32-byte account identifier. The all-zero value is the null account.
///
/// Human-readable formats (JSON) carry it as base-58; binary formats as raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub const NULL: AccountId = AccountId([0u8; 32]);

    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Deterministic identifier for a human label: BLAKE3(label).
    pub fn derive(label: &str) -> Self {
        Self(*blake3::hash(label.as_bytes()).as_bytes())
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Base-58 encoded string representation.
    pub fn to_b58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    pub fn from_b58(s: &str) -> Result<Self, MintgateError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| MintgateError::InvalidAccount(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| MintgateError::InvalidAccount(format!("{} bytes, expected 32", v.len())))?;
        Ok(Self(arr))
    }
}

impl FromStr for AccountId {
    type Err = MintgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_b58(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_b58())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_b58(&s).map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_b58())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b58 = self.to_b58();
        write!(f, "AccountId({})", &b58[..b58.len().min(8)])
    }
}

// ── CallId ───────────────────────────────────────────────────────────────────

/// 32-byte call identifier: BLAKE3 of the canonical serialized call and its timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub [u8; 32]);

impl CallId {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallId({}…)", &self.to_hex()[..16])
    }
}
