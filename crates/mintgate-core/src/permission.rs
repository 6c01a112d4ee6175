//! The closed permission set and its name ↔ id registry.
//!
//! Names are only resolved at the call boundary; everything past the
//! boundary works with [`Permission`] directly. An unregistered name is an
//! error, never an alias for id 0.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MintgateError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Permission {
    Authorize = 0,
    Unauthorize = 1,
    LockPermissions = 2,
    AdjustVariables = 3,
    Emission = 4,
    AdjustMinting = 5,
    GameEmission = 6,
}

impl Permission {
    /// Every permission, in id order.
    pub const ALL: [Permission; 7] = [
        Permission::Authorize,
        Permission::Unauthorize,
        Permission::LockPermissions,
        Permission::AdjustVariables,
        Permission::Emission,
        Permission::AdjustMinting,
        Permission::GameEmission,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Permission::Authorize => "AUTHORIZE",
            Permission::Unauthorize => "UNAUTHORIZE",
            Permission::LockPermissions => "LOCK_PERMISSIONS",
            Permission::AdjustVariables => "ADJUST_VARIABLES",
            Permission::Emission => "EMISSION",
            Permission::AdjustMinting => "ADJUST_MINTING",
            Permission::GameEmission => "GAME_EMISSION",
        }
    }

    pub fn from_id(id: u8) -> Option<Permission> {
        Self::ALL.get(id as usize).copied()
    }

    /// Resolve a permission name. Matching ignores ASCII case.
    pub fn from_name(name: &str) -> Result<Permission, MintgateError> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| MintgateError::UnknownPermission(name.to_string()))
    }

    /// Resolve a list of names; fails on the first unknown one.
    pub fn resolve_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Permission>, MintgateError> {
        names.iter().map(|n| Self::from_name(n.as_ref())).collect()
    }
}

impl FromStr for Permission {
    type Err = MintgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_dense() {
        for (i, p) in Permission::ALL.iter().enumerate() {
            assert_eq!(p.id() as usize, i);
            assert_eq!(Permission::from_id(i as u8), Some(*p));
        }
        assert_eq!(Permission::from_id(7), None);
    }

    #[test]
    fn names_round_trip() {
        for p in Permission::ALL {
            assert_eq!(Permission::from_name(p.name()).unwrap(), p);
        }
        assert_eq!(Permission::from_name("game_emission").unwrap(), Permission::GameEmission);
    }

    #[test]
    fn unknown_name_does_not_alias_authorize() {
        let err = Permission::from_name("MINT_EVERYTHING").unwrap_err();
        assert!(matches!(err, MintgateError::UnknownPermission(n) if n == "MINT_EVERYTHING"));
        assert!(Permission::from_name("").is_err());
    }

    #[test]
    fn resolve_all_stops_at_unknown() {
        assert!(Permission::resolve_all(&["EMISSION", "NOPE"]).is_err());
        assert_eq!(
            Permission::resolve_all(&["EMISSION", "AUTHORIZE"]).unwrap(),
            vec![Permission::Emission, Permission::Authorize]
        );
    }

    #[test]
    fn serde_uses_registry_names() {
        let json = serde_json::to_string(&Permission::LockPermissions).unwrap();
        assert_eq!(json, "\"LOCK_PERMISSIONS\"");
    }
}
