//! Session cache: user id → currently-live token, with expiry.
//!
//! The cache is what makes a self-contained token revocable: a token that
//! still decodes fine stops authorizing requests the moment its entry is
//! overwritten or deleted here.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use usergate_core::UserId;

mod memory;
mod redis;

pub use memory::InMemorySessionStore;
pub use redis::RedisSessionStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("session cache unavailable: {0}")]
    Unavailable(String),
}

/// Shared, concurrency-safe session store handle.
///
/// Per-key operations are linearized by the backing store; `put` is
/// last-write-wins, which is exactly the at-most-one-live-session
/// behavior the gateway wants for concurrent logins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record `token` as the single live session for `user_id`,
    /// unconditionally overwriting (and thereby revoking) any previous
    /// entry.
    async fn put(
        &self,
        user_id: UserId,
        token: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    /// The current live token for `user_id`, or `None` if there is no
    /// entry or it has expired from the store.
    async fn get(&self, user_id: UserId) -> Result<Option<String>, SessionStoreError>;

    /// Remove the entry, immediately revoking the user's session.
    /// Idempotent.
    async fn delete(&self, user_id: UserId) -> Result<(), SessionStoreError>;
}

/// Key layout shared by all store implementations.
pub(crate) fn session_key(user_id: UserId) -> String {
    format!("user:token:{}", user_id.as_i64())
}
