//! User-record proxy endpoints.
//!
//! Handlers run the access guard first, then forward the operation to the
//! user-data service. Role changes, account deletion and password changes
//! also revoke the affected user's live session; the revocation is part
//! of the operation, so a failed cache delete fails the request.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};

use usergate_auth::hash_password;
use usergate_core::{AuthError, UserId};
use usergate_infra::NewUserRecord;

use crate::app::dto::{
    ChangePasswordRequest, ChangeRoleRequest, CreateUserRequest, UpdateInfoRequest, UserView,
};
use crate::app::routes::common;
use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/new", post(create))
        .route("/info", get(own_info).put(update_own_info))
        .route("/info/:username", get(info_by_username))
        .route("/password", put(change_password))
        .route("/role", put(change_role))
        .route("/:username", delete(remove))
}

/// POST /user/new — create a record (ADMIN). The password is hashed here;
/// plaintext never reaches the user-data service.
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    if let Err(response) = common::authorize(&services, &headers, common::admin_scope()).await {
        return response;
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(err) => {
            return errors::auth_error_response(AuthError::Internal(err.to_string()), None);
        }
    };

    let record = NewUserRecord {
        username: req.username,
        password_hash,
        name: req.name,
        phone_number: req.phone_number,
        role: req.role,
        email: req.email,
    };

    match services.directory.create_user(record).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(err) => errors::directory_error_response(err),
    }
}

/// GET /user/info — the caller's own record.
pub async fn own_info(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    let caller = match common::authorize(&services, &headers, common::user_scope()).await {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match services.directory.get_user(&caller.username).await {
        Ok(record) => (StatusCode::OK, Json(UserView::from(record))).into_response(),
        Err(err) => errors::directory_error_response(err),
    }
}

/// GET /user/info/{username} — any record (ADMIN).
pub async fn info_by_username(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    if let Err(response) = common::authorize(&services, &headers, common::admin_scope()).await {
        return response;
    }

    match services.directory.get_user(&username).await {
        Ok(record) => (StatusCode::OK, Json(UserView::from(record))).into_response(),
        Err(err) => errors::directory_error_response(err),
    }
}

/// PUT /user/info — the caller updates their own name/email/phone.
pub async fn update_own_info(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(req): Json<UpdateInfoRequest>,
) -> Response {
    let caller = match common::authorize(&services, &headers, common::user_scope()).await {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match services
        .directory
        .update_info(&caller.username, req.into())
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => errors::directory_error_response(err),
    }
}

/// PUT /user/password — the caller changes their own password. The live
/// session is revoked afterward; the client must log in again.
pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(req): Json<ChangePasswordRequest>,
) -> Response {
    let caller = match common::authorize(&services, &headers, common::user_scope()).await {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    let password_hash = match hash_password(&req.new_password) {
        Ok(hash) => hash,
        Err(err) => {
            return errors::auth_error_response(AuthError::Internal(err.to_string()), None);
        }
    };

    if let Err(err) = services
        .directory
        .update_password(&caller.username, &password_hash)
        .await
    {
        return errors::directory_error_response(err);
    }

    match revoke_session(&services, caller.user_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(response) => response,
    }
}

/// PUT /user/role — change a user's role (ADMIN). Revokes the target's
/// live session so tokens minted under the old role stop working.
pub async fn change_role(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(req): Json<ChangeRoleRequest>,
) -> Response {
    if let Err(response) = common::authorize(&services, &headers, common::admin_scope()).await {
        return response;
    }

    let target = match services.directory.get_user(&req.username).await {
        Ok(record) => record,
        Err(err) => return errors::directory_error_response(err),
    };

    if let Err(err) = services.directory.update_role(&req.username, req.role).await {
        return errors::directory_error_response(err);
    }

    match revoke_session(&services, target.user_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(response) => response,
    }
}

/// DELETE /user/{username} — delete a record (ADMIN) and revoke the
/// target's live session.
pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    if let Err(response) = common::authorize(&services, &headers, common::admin_scope()).await {
        return response;
    }

    let target = match services.directory.get_user(&username).await {
        Ok(record) => record,
        Err(err) => return errors::directory_error_response(err),
    };

    if let Err(err) = services.directory.delete_user(&username).await {
        return errors::directory_error_response(err);
    }

    match revoke_session(&services, target.user_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(response) => response,
    }
}

/// Delete the session entry for `user_id`, surfacing an unreachable cache
/// as a server error: the record change went through but the old token is
/// still live, which the caller must not mistake for success.
async fn revoke_session(services: &AppServices, user_id: UserId) -> Result<(), Response> {
    services.sessions.delete(user_id).await.map_err(|err| {
        tracing::error!(%user_id, error = %err, "session revocation failed");
        errors::auth_error_response(AuthError::CacheUnavailable(err.to_string()), None)
    })
}
