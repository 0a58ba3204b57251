use serde::{Deserialize, Serialize};

use usergate_auth::Role;
use usergate_core::UserId;
use usergate_infra::{UserInfoPatch, UserRecord};

// -------------------------
// Request DTOs
// -------------------------

/// Login form body (`application/x-www-form-urlencoded`). `scope` is a
/// space-delimited list of scope names; omitting it is rejected by the
/// authenticator, not the parser.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub scope: Option<String>,
}

impl LoginRequest {
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
    pub role: Role,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInfoRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl From<UpdateInfoRequest> for UserInfoPatch {
    fn from(req: UpdateInfoRequest) -> Self {
        UserInfoPatch {
            name: req.name,
            email: req.email,
            phone_number: req.phone_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub username: String,
    pub role: Role,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// A user record as exposed to clients: the stored password hash never
/// leaves the gateway.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub user_id: UserId,
    pub username: String,
    pub name: String,
    pub phone_number: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            user_id: record.user_id,
            username: record.username,
            name: record.name,
            phone_number: record.phone_number,
            role: record.role,
            email: record.email,
        }
    }
}
