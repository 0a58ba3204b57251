//! Per-request authorization.

use std::sync::Arc;

use usergate_auth::{CallerIdentity, ScopeSet, TokenCodec};
use usergate_core::{AuthError, AuthResult};

use crate::session::SessionStore;

/// Checks a presented bearer token before a route handler runs: decode,
/// session liveness, then scope enforcement.
pub struct AccessGuard {
    sessions: Arc<dyn SessionStore>,
    codec: Arc<TokenCodec>,
}

impl AccessGuard {
    pub fn new(sessions: Arc<dyn SessionStore>, codec: Arc<TokenCodec>) -> Self {
        Self { sessions, codec }
    }

    /// Validate `token` and enforce `required` scopes, yielding the caller
    /// identity for the handler.
    ///
    /// An unreachable session store reads as "no session" here: when
    /// liveness cannot be confirmed the request is rejected, never waved
    /// through.
    pub async fn authorize(&self, token: &str, required: ScopeSet) -> AuthResult<CallerIdentity> {
        let claims = self.codec.decode(token).map_err(|e| {
            tracing::debug!(error = ?e, "token rejected");
            AuthError::Unauthenticated
        })?;

        let live = match self.sessions.get(claims.user_id).await {
            Ok(live) => live,
            Err(e) => {
                tracing::error!(user_id = %claims.user_id, error = %e, "session lookup failed; failing closed");
                return Err(AuthError::Unauthenticated);
            }
        };

        // The cached token must *be* this token; a superseded or revoked
        // token still decodes but is no longer the live session.
        match live {
            Some(current) if current == token => {}
            _ => {
                tracing::debug!(user_id = %claims.user_id, "token expired or revoked");
                return Err(AuthError::Unauthenticated);
            }
        }

        let missing = claims.scopes.missing(required);
        if let Some(scope) = missing.iter().next() {
            return Err(AuthError::Forbidden {
                missing: scope.as_str().to_string(),
            });
        }

        Ok(claims.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use usergate_auth::{AccessClaims, Role, Scope};
    use usergate_core::UserId;

    use crate::session::{InMemorySessionStore, SessionStoreError};

    const TTL: Duration = Duration::from_secs(600);

    fn codec(secret: &[u8]) -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(secret, "HS256").unwrap())
    }

    fn claims_for(role: Role, scopes: ScopeSet) -> AccessClaims {
        AccessClaims::new(
            UserId::new(7),
            "alice",
            role,
            scopes,
            Utc::now() + chrono::Duration::minutes(10),
        )
    }

    async fn issue_live(
        codec: &Arc<TokenCodec>,
        sessions: &Arc<InMemorySessionStore>,
        claims: &AccessClaims,
    ) -> String {
        let token = codec.issue(claims).unwrap();
        sessions.put(claims.user_id, &token, TTL).await.unwrap();
        token
    }

    #[tokio::test]
    async fn live_token_with_sufficient_scope_yields_identity() {
        let codec = codec(b"test-secret");
        let sessions = Arc::new(InMemorySessionStore::new());
        let guard = AccessGuard::new(sessions.clone(), codec.clone());

        let claims = claims_for(Role::User, ScopeSet::from(Scope::User));
        let token = issue_live(&codec, &sessions, &claims).await;

        let caller = guard
            .authorize(&token, ScopeSet::from(Scope::User))
            .await
            .unwrap();
        assert_eq!(caller.user_id, UserId::new(7));
        assert_eq!(caller.username, "alice");
        assert_eq!(caller.role, Role::User);
    }

    #[tokio::test]
    async fn admin_scopes_satisfy_user_requirement() {
        let codec = codec(b"test-secret");
        let sessions = Arc::new(InMemorySessionStore::new());
        let guard = AccessGuard::new(sessions.clone(), codec.clone());

        let claims = claims_for(Role::Admin, ScopeSet::from(Scope::Admin).expand());
        let token = issue_live(&codec, &sessions, &claims).await;

        assert!(guard
            .authorize(&token, ScopeSet::from(Scope::User))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn user_scopes_fail_admin_requirement_with_forbidden() {
        let codec = codec(b"test-secret");
        let sessions = Arc::new(InMemorySessionStore::new());
        let guard = AccessGuard::new(sessions.clone(), codec.clone());

        let claims = claims_for(Role::User, ScopeSet::from(Scope::User));
        let token = issue_live(&codec, &sessions, &claims).await;

        let err = guard
            .authorize(&token, ScopeSet::from(Scope::Admin).expand())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::Forbidden {
                missing: "ADMIN".to_string()
            }
        );
    }

    #[tokio::test]
    async fn revoked_token_is_unauthenticated_despite_valid_signature() {
        let codec = codec(b"test-secret");
        let sessions = Arc::new(InMemorySessionStore::new());
        let guard = AccessGuard::new(sessions.clone(), codec.clone());

        let claims = claims_for(Role::User, ScopeSet::from(Scope::User));
        let token = issue_live(&codec, &sessions, &claims).await;

        sessions.delete(claims.user_id).await.unwrap();

        assert_eq!(
            guard
                .authorize(&token, ScopeSet::from(Scope::User))
                .await
                .unwrap_err(),
            AuthError::Unauthenticated
        );
    }

    #[tokio::test]
    async fn superseded_token_is_unauthenticated() {
        let codec = codec(b"test-secret");
        let sessions = Arc::new(InMemorySessionStore::new());
        let guard = AccessGuard::new(sessions.clone(), codec.clone());

        let first = claims_for(Role::User, ScopeSet::from(Scope::User));
        let first_token = issue_live(&codec, &sessions, &first).await;

        let second = claims_for(Role::User, ScopeSet::from(Scope::User));
        let _second_token = issue_live(&codec, &sessions, &second).await;

        assert_eq!(
            guard
                .authorize(&first_token, ScopeSet::from(Scope::User))
                .await
                .unwrap_err(),
            AuthError::Unauthenticated
        );
    }

    #[tokio::test]
    async fn wrong_secret_token_is_unauthenticated() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let guard = AccessGuard::new(sessions.clone(), codec(b"right-secret"));

        let forged_codec = codec(b"wrong-secret");
        let claims = claims_for(Role::Admin, ScopeSet::from(Scope::Admin).expand());
        let token = forged_codec.issue(&claims).unwrap();
        sessions.put(claims.user_id, &token, TTL).await.unwrap();

        assert_eq!(
            guard
                .authorize(&token, ScopeSet::from(Scope::User))
                .await
                .unwrap_err(),
            AuthError::Unauthenticated
        );
    }

    struct UnreachableSessionStore;

    #[async_trait]
    impl SessionStore for UnreachableSessionStore {
        async fn put(&self, _: UserId, _: &str, _: Duration) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::Unavailable("connection refused".to_string()))
        }

        async fn get(&self, _: UserId) -> Result<Option<String>, SessionStoreError> {
            Err(SessionStoreError::Unavailable("connection refused".to_string()))
        }

        async fn delete(&self, _: UserId) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn unreachable_cache_fails_closed() {
        let codec = codec(b"test-secret");
        let guard = AccessGuard::new(Arc::new(UnreachableSessionStore), codec.clone());

        let claims = claims_for(Role::Admin, ScopeSet::from(Scope::Admin).expand());
        let token = codec.issue(&claims).unwrap();

        assert_eq!(
            guard
                .authorize(&token, ScopeSet::from(Scope::User))
                .await
                .unwrap_err(),
            AuthError::Unauthenticated
        );
    }
}
