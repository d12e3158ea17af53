//! Authenticated principal and the roles it can carry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_MODERATOR, ROLE_PREFIX, ROLE_USER};

/// Realm roles the API knows about.
///
/// Roles are flat: holding `Admin` does not imply `Moderator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Moderator,
    Admin,
    User,
}

impl Role {
    /// Parse a role claim such as `MODERATOR`, `moderator` or `ROLE_MODERATOR`.
    ///
    /// Returns `None` for roles this API does not model.
    pub fn from_claim(claim: &str) -> Option<Self> {
        let claim = claim.trim();
        let name = match claim.get(..ROLE_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(ROLE_PREFIX) => &claim[ROLE_PREFIX.len()..],
            _ => claim,
        };

        [Role::Moderator, Role::Admin, Role::User]
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
    }

    /// Canonical claim name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Moderator => ROLE_MODERATOR,
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attached to an inbound request once its token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    /// Build a principal from raw role claims, dropping unknown roles.
    pub fn from_claims<I, S>(username: impl Into<String>, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            username: username.into(),
            roles: claims
                .into_iter()
                .filter_map(|claim| Role::from_claim(claim.as_ref()))
                .collect(),
        }
    }

    /// Check whether the principal holds `role`
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
