//! Error → HTTP response translation.
//!
//! Every failure a handler can see funnels through here so status codes
//! and bodies stay consistent across routes. Login rejections collapse to
//! one generic body regardless of the internal reason (the real reason is
//! logged server-side, never sent to the client).

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use usergate_auth::ScopeSet;
use usergate_core::AuthError;
use usergate_infra::DirectoryError;

/// Gateway response codes, in the same numeric style the user-data
/// service speaks (its 1xxx codes pass through unchanged on conflicts).
pub mod codes {
    pub const INVALID_SCOPE: u32 = 2001;
    pub const DEPENDENCY_UNAVAILABLE: u32 = 2002;
    pub const LOGIN_REJECTED: u32 = 2401;
    pub const UNAUTHENTICATED: u32 = 2403;
    pub const NOT_FOUND: u32 = 2404;
    pub const FORBIDDEN: u32 = 2405;
    pub const INTERNAL: u32 = 2500;
}

pub fn json_error(status: StatusCode, code: u32, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Translate a gateway [`AuthError`] into a response. `challenge` is the
/// scope set the route requires; it is named in the `WWW-Authenticate`
/// header on 401/403 responses.
pub fn auth_error_response(err: AuthError, challenge: Option<ScopeSet>) -> Response {
    match err {
        // One body for unknown user, wrong password and insufficient role.
        AuthError::UserNotFound | AuthError::InvalidCredentials | AuthError::InsufficientRole => {
            json_error(
                StatusCode::UNAUTHORIZED,
                codes::LOGIN_REJECTED,
                "incorrect username or password",
            )
        }
        AuthError::InvalidScopeRequest(ref detail) => json_error(
            StatusCode::BAD_REQUEST,
            codes::INVALID_SCOPE,
            format!("invalid scope request: {detail}"),
        ),
        AuthError::Unauthenticated => with_challenge(
            json_error(
                StatusCode::UNAUTHORIZED,
                codes::UNAUTHENTICATED,
                "could not validate credentials",
            ),
            challenge,
        ),
        AuthError::Forbidden { .. } => with_challenge(
            json_error(StatusCode::FORBIDDEN, codes::FORBIDDEN, "not enough permissions"),
            challenge,
        ),
        AuthError::Conflict { code, message } => {
            json_error(StatusCode::CONFLICT, code, message)
        }
        AuthError::UpstreamUnavailable(ref reason) | AuthError::CacheUnavailable(ref reason) => {
            tracing::error!(%reason, "dependency unreachable");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::DEPENDENCY_UNAVAILABLE,
                "service temporarily unavailable",
            )
        }
        AuthError::Backend { code, ref message } => {
            tracing::error!(code, %message, "user-data service error");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                "internal error, contact support",
            )
        }
        AuthError::Internal(ref reason) => {
            tracing::error!(%reason, "internal gateway error");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                "internal error, contact support",
            )
        }
    }
}

/// Translate a [`DirectoryError`] from a record-proxy route (create,
/// info, role, password, delete). Login-time directory failures take the
/// [`auth_error_response`] path instead, where not-found must stay
/// indistinguishable from a bad password.
pub fn directory_error_response(err: DirectoryError) -> Response {
    match err {
        DirectoryError::NotFound => {
            json_error(StatusCode::NOT_FOUND, codes::NOT_FOUND, "user not found")
        }
        DirectoryError::Conflict { code, message } => {
            json_error(StatusCode::CONFLICT, code, message)
        }
        DirectoryError::Unavailable(reason) => {
            tracing::error!(%reason, "user-data service unreachable");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::DEPENDENCY_UNAVAILABLE,
                "service temporarily unavailable",
            )
        }
        DirectoryError::Backend { code, message } => {
            tracing::error!(code, %message, "user-data service error");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                "internal error, contact support",
            )
        }
    }
}

fn with_challenge(mut response: Response, challenge: Option<ScopeSet>) -> Response {
    let value = match challenge {
        Some(scopes) if !scopes.is_empty() => format!("Bearer scope=\"{scopes}\""),
        _ => "Bearer".to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, value);
    }
    response
}
