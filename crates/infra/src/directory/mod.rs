//! User-data service boundary.
//!
//! The gateway proxies record CRUD to a remote user-data service. The
//! service answers every call with a numeric status code; `1200` is OK and
//! everything else maps into [`DirectoryError`] here, at the boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use usergate_auth::Role;
use usergate_core::UserId;

mod http;
mod memory;

pub use http::HttpUserDirectory;
pub use memory::InMemoryUserDirectory;

/// Status codes spoken by the user-data service.
pub mod codes {
    pub const OK: u32 = 1200;
    pub const NOT_FOUND: u32 = 1401;
    pub const USERNAME_TAKEN: u32 = 1403;
    pub const EMAIL_TAKEN: u32 = 1406;
    pub const PHONE_TAKEN: u32 = 1407;
}

/// A user record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub phone_number: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload for creating a record. The password is already hashed by the
/// gateway; plaintext never crosses this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserRecord {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub phone_number: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Partial update of the non-credential fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("user not found")]
    NotFound,

    /// Uniqueness conflict; `code` is the backend's own status code
    /// (1403/1406/1407).
    #[error("{message}")]
    Conflict { code: u32, message: String },

    /// The service could not be reached (connect failure or timeout).
    #[error("user-data service unavailable: {0}")]
    Unavailable(String),

    /// Any other non-OK status code.
    #[error("user-data service error {code}: {message}")]
    Backend { code: u32, message: String },
}

/// Remote-procedure interface to the user-data service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<UserRecord, DirectoryError>;

    async fn create_user(&self, record: NewUserRecord) -> Result<(), DirectoryError>;

    async fn update_info(
        &self,
        username: &str,
        patch: UserInfoPatch,
    ) -> Result<(), DirectoryError>;

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), DirectoryError>;

    async fn update_role(&self, username: &str, role: Role) -> Result<(), DirectoryError>;

    async fn delete_user(&self, username: &str) -> Result<(), DirectoryError>;
}
