//! In-memory session store (tests and single-process development).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use usergate_core::UserId;

use super::{SessionStore, SessionStoreError};

/// Process-local session store with the same overwrite/TTL semantics as
/// the Redis store. Expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<i64, Entry>>,
}

#[derive(Debug, Clone)]
struct Entry {
    token: String,
    expires_at: Instant,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(
        &self,
        user_id: UserId,
        token: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SessionStoreError::Unavailable("store lock poisoned".to_string()))?;
        entries.insert(
            user_id.as_i64(),
            Entry {
                token: token.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<String>, SessionStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SessionStoreError::Unavailable("store lock poisoned".to_string()))?;

        match entries.get(&user_id.as_i64()) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.token.clone())),
            Some(_) => {
                entries.remove(&user_id.as_i64());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: UserId) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SessionStoreError::Unavailable("store lock poisoned".to_string()))?;
        entries.remove(&user_id.as_i64());
        Ok(())
    }
}
