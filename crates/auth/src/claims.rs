//! Token claims model (transport-agnostic).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use usergate_core::UserId;

use crate::{CallerIdentity, Role, ScopeSet};

/// The claim set embedded in an access token.
///
/// Invariant: `scopes` is never empty in an issued token (the login path
/// rejects empty/unknown scope requests before issuance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub scopes: ScopeSet,

    /// Absolute expiry, unix seconds (standard `exp` claim position).
    pub exp: i64,

    /// Unique token id. Keeps two logins in the same second from minting
    /// byte-identical tokens, so superseding a session always invalidates
    /// the previous token string.
    pub jti: String,
}

impl AccessClaims {
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        role: Role,
        scopes: ScopeSet,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
            scopes,
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// The request-scoped identity derived from these claims.
    pub fn identity(&self) -> CallerIdentity {
        CallerIdentity {
            user_id: self.user_id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}
