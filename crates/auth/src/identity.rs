//! Authenticated caller identity.

use serde::Serialize;

use usergate_core::UserId;

use crate::Role;

/// Identity handed to route handlers after a request passes the access
/// guard. Derived fresh from validated claims on every request; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}
