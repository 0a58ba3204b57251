//! Redis-backed session store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use usergate_core::UserId;

use super::{session_key, SessionStore, SessionStoreError};

/// Session store over a shared Redis connection.
///
/// The [`ConnectionManager`] is a cheap-to-clone handle that multiplexes
/// and reconnects internally; one instance is built at startup and shared
/// by every request task.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect to the cache store at `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(
        &self,
        user_id: UserId,
        token: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(session_key(user_id), token, ttl.as_secs())
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))
    }

    async fn get(&self, user_id: UserId) -> Result<Option<String>, SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(session_key(user_id))
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        // DEL on a missing key is a no-op, which gives us idempotency.
        conn.del::<_, i64>(session_key(user_id))
            .await
            .map(|_| ())
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))
    }
}
