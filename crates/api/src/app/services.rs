//! Service construction and dependency injection.
//!
//! Every client handle (cache connection, user-data client, token codec)
//! is constructed exactly once here and passed by reference into the
//! components that need it. Nothing is lazily initialized behind a global.

use std::sync::Arc;
use std::time::Duration;

use usergate_auth::TokenCodec;
use usergate_infra::{
    AccessGuard, Authenticator, HttpUserDirectory, InMemorySessionStore, InMemoryUserDirectory,
    RedisSessionStore, SessionStore, UserDirectory,
};

use crate::config::AppConfig;

/// Shared service handles for the request handlers.
pub struct AppServices {
    pub authenticator: Authenticator,
    pub guard: AccessGuard,
    pub directory: Arc<dyn UserDirectory>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppServices {
    /// Production wiring: Redis session cache + remote user-data service.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let codec = Arc::new(TokenCodec::new(
            config.secret_key.as_bytes(),
            &config.algorithm,
        )?);

        let sessions: Arc<dyn SessionStore> =
            Arc::new(RedisSessionStore::connect(&config.cache_url).await?);
        let directory: Arc<dyn UserDirectory> = Arc::new(HttpUserDirectory::new(
            &config.userdata_url,
            config.userdata_timeout,
        )?);

        Ok(Self::assemble(directory, sessions, codec, config.token_ttl))
    }

    /// Process-local wiring (tests, demos). Returns the concrete stores so
    /// callers can seed records and inspect sessions.
    pub fn in_memory(
        secret: &str,
        token_ttl: Duration,
    ) -> (Self, Arc<InMemoryUserDirectory>, Arc<InMemorySessionStore>) {
        let codec = Arc::new(
            TokenCodec::new(secret.as_bytes(), "HS256")
                .expect("HS256 is always a supported algorithm"),
        );
        let directory = Arc::new(InMemoryUserDirectory::new());
        let sessions = Arc::new(InMemorySessionStore::new());

        let services = Self::assemble(directory.clone(), sessions.clone(), codec, token_ttl);
        (services, directory, sessions)
    }

    fn assemble(
        directory: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Self {
        let authenticator = Authenticator::new(
            directory.clone(),
            sessions.clone(),
            codec.clone(),
            token_ttl,
        );
        let guard = AccessGuard::new(sessions.clone(), codec);

        Self {
            authenticator,
            guard,
            directory,
            sessions,
        }
    }
}
