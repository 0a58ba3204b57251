//! In-memory user directory (tests and single-process development).

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use usergate_auth::Role;
use usergate_core::UserId;

use super::{codes, DirectoryError, NewUserRecord, UserDirectory, UserInfoPatch, UserRecord};

/// Process-local directory with the same status-code semantics as the
/// remote service (not-found, username/email/phone uniqueness).
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
    next_id: AtomicI64,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn lock_error() -> DirectoryError {
        DirectoryError::Unavailable("directory lock poisoned".to_string())
    }

    fn check_uniqueness(
        users: &HashMap<String, UserRecord>,
        username: &str,
        email: Option<&str>,
        phone_number: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<(), DirectoryError> {
        for record in users.values() {
            if Some(record.username.as_str()) == exclude {
                continue;
            }
            if record.username == username {
                return Err(DirectoryError::Conflict {
                    code: codes::USERNAME_TAKEN,
                    message: "username already exists".to_string(),
                });
            }
            if email.is_some() && record.email.as_deref() == email {
                return Err(DirectoryError::Conflict {
                    code: codes::EMAIL_TAKEN,
                    message: "email already exists".to_string(),
                });
            }
            if phone_number == Some(record.phone_number.as_str()) {
                return Err(DirectoryError::Conflict {
                    code: codes::PHONE_TAKEN,
                    message: "phone number already exists".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user(&self, username: &str) -> Result<UserRecord, DirectoryError> {
        let users = self.users.read().map_err(|_| Self::lock_error())?;
        users.get(username).cloned().ok_or(DirectoryError::NotFound)
    }

    async fn create_user(&self, record: NewUserRecord) -> Result<(), DirectoryError> {
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;

        Self::check_uniqueness(
            &users,
            &record.username,
            record.email.as_deref(),
            Some(record.phone_number.as_str()),
            None,
        )?;

        let user_id = UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        users.insert(
            record.username.clone(),
            UserRecord {
                user_id,
                username: record.username,
                password_hash: record.password_hash,
                name: record.name,
                phone_number: record.phone_number,
                role: record.role,
                email: record.email,
            },
        );
        Ok(())
    }

    async fn update_info(
        &self,
        username: &str,
        patch: UserInfoPatch,
    ) -> Result<(), DirectoryError> {
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;

        if !users.contains_key(username) {
            return Err(DirectoryError::NotFound);
        }
        Self::check_uniqueness(
            &users,
            username,
            patch.email.as_deref(),
            patch.phone_number.as_deref(),
            Some(username),
        )?;

        let record = users.get_mut(username).ok_or(DirectoryError::NotFound)?;
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(email) = patch.email {
            record.email = Some(email);
        }
        if let Some(phone_number) = patch.phone_number {
            record.phone_number = phone_number;
        }
        Ok(())
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), DirectoryError> {
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;
        let record = users.get_mut(username).ok_or(DirectoryError::NotFound)?;
        record.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn update_role(&self, username: &str, role: Role) -> Result<(), DirectoryError> {
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;
        let record = users.get_mut(username).ok_or(DirectoryError::NotFound)?;
        record.role = role;
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;
        users.remove(username).map(|_| ()).ok_or(DirectoryError::NotFound)
    }
}
