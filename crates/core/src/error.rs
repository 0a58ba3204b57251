//! Gateway error taxonomy.
//!
//! Every failure a core operation (login, authorize, record proxying) can
//! produce is a variant here. The HTTP layer owns the mapping to status
//! codes and response bodies; transport faults from the cache store or the
//! user-data service are translated into variants at each operation
//! boundary and never propagate as unhandled faults.

use thiserror::Error;

/// Result type used across the gateway core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Gateway-level error.
///
/// Security note: `UserNotFound`, `InvalidCredentials` and
/// `InsufficientRole` are distinct variants so the server can log the real
/// reason, but the HTTP layer collapses all three into one generic
/// login-rejection response to prevent username enumeration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A login requested a scope outside the known vocabulary, or no
    /// scopes at all.
    #[error("invalid scope request: {0}")]
    InvalidScopeRequest(String),

    /// The named account does not exist in the user-data service.
    #[error("user not found")]
    UserNotFound,

    /// The presented password did not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account's role does not authorize the requested scopes.
    #[error("role does not authorize requested scopes")]
    InsufficientRole,

    /// Missing, malformed, expired or revoked token.
    #[error("could not validate credentials")]
    Unauthenticated,

    /// Valid, live token that does not carry a required scope.
    #[error("not enough permissions: missing scope {missing}")]
    Forbidden { missing: String },

    /// The user-data service reported a uniqueness conflict
    /// (username/email/phone number already taken).
    #[error("{message}")]
    Conflict { code: u32, message: String },

    /// The user-data service could not be reached (connect/timeout).
    #[error("user-data service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The session cache could not be reached.
    #[error("session cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Any other non-OK status from the user-data service.
    #[error("user-data service error (code {code})")]
    Backend { code: u32, message: String },

    /// An internal fault inside the gateway itself (e.g. token signing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this is one of the login-rejection reasons that must be
    /// indistinguishable to the client.
    pub fn is_login_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::UserNotFound | AuthError::InvalidCredentials | AuthError::InsufficientRole
        )
    }
}
