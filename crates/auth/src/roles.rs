//! Role model for RBAC.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scope::{Scope, ScopeSet};

/// Account role, as stored by the user-data service and carried in tokens.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// The scope set this role is allowed to obtain at login.
    ///
    /// ADMIN accounts may hold both scopes; USER accounts only USER.
    pub fn grants(&self) -> ScopeSet {
        match self {
            Role::Admin => ScopeSet::from(Scope::Admin).expand(),
            Role::User => ScopeSet::from(Scope::User),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_grants_both_scopes() {
        let grants = Role::Admin.grants();
        assert!(grants.contains(Scope::Admin));
        assert!(grants.contains(Scope::User));
    }

    #[test]
    fn user_grants_only_user() {
        let grants = Role::User.grants();
        assert!(grants.contains(Scope::User));
        assert!(!grants.contains(Scope::Admin));
    }

    #[test]
    fn wire_spelling_is_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("user".parse::<Role>().is_err());
    }
}
