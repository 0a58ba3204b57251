//! Shared handler plumbing: bearer extraction and the per-route guard
//! call.

use axum::http::{header, HeaderMap};
use axum::response::Response;

use usergate_auth::{CallerIdentity, Scope, ScopeSet};
use usergate_core::AuthError;

use crate::app::errors;
use crate::app::services::AppServices;

/// Scope requirement for endpoints any authenticated user may call.
pub fn user_scope() -> ScopeSet {
    ScopeSet::from(Scope::User)
}

/// Scope requirement for administrative endpoints. ADMIN implies USER,
/// so this asks for both.
pub fn admin_scope() -> ScopeSet {
    ScopeSet::from(Scope::Admin).expand()
}

/// Run the access guard for a protected route: extract the bearer token
/// and enforce `required`, or produce the finished error response.
pub async fn authorize(
    services: &AppServices,
    headers: &HeaderMap,
    required: ScopeSet,
) -> Result<CallerIdentity, Response> {
    let Some(token) = extract_bearer(headers) else {
        return Err(errors::auth_error_response(
            AuthError::Unauthenticated,
            Some(required),
        ));
    };

    services
        .guard
        .authorize(token, required)
        .await
        .map_err(|err| errors::auth_error_response(err, Some(required)))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();

    (!token.is_empty()).then_some(token)
}
