//! Login and identity endpoints.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};

use crate::app::dto::{LoginRequest, TokenResponse};
use crate::app::routes::common;
use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/whoami", get(whoami))
}

/// POST /auth/login — exchange credentials for a bearer token.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<LoginRequest>,
) -> Response {
    match services
        .authenticator
        .login(&form.username, &form.password, &form.scopes())
        .await
    {
        Ok(token) => (StatusCode::OK, Json(TokenResponse::bearer(token))).into_response(),
        Err(err) => errors::auth_error_response(err, None),
    }
}

/// GET /auth/whoami — the caller identity behind the presented token.
pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    let caller = match common::authorize(&services, &headers, common::user_scope()).await {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    (StatusCode::OK, Json(caller)).into_response()
}
