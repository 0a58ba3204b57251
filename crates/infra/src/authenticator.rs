//! Login orchestration.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use usergate_auth::{verify_password, AccessClaims, Scope, ScopeSet, TokenCodec};
use usergate_core::{AuthError, AuthResult};

use crate::directory::{DirectoryError, UserDirectory};
use crate::session::{SessionStore, SessionStoreError};

/// Orchestrates a login: scope validation, record lookup, credential
/// verification, token issuance and the session-cache write.
///
/// Both the token expiry and the cache TTL derive from the single
/// `token_ttl` passed at construction, so the two cannot drift apart.
pub struct Authenticator {
    directory: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    codec: Arc<TokenCodec>,
    token_ttl: Duration,
}

impl Authenticator {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            directory,
            sessions,
            codec,
            token_ttl,
        }
    }

    /// Authenticate `username` and issue a bearer token carrying the
    /// requested scopes.
    ///
    /// The cache write is part of the login: if the session entry cannot
    /// be recorded, no token is returned.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        requested_scopes: &[String],
    ) -> AuthResult<String> {
        tracing::debug!(username, scopes = ?requested_scopes, "login request");

        let granted = parse_requested_scopes(requested_scopes)?.expand();

        let user = self.directory.get_user(username).await.map_err(|e| match e {
            DirectoryError::NotFound => AuthError::UserNotFound,
            DirectoryError::Unavailable(reason) => AuthError::UpstreamUnavailable(reason),
            DirectoryError::Conflict { code, message }
            | DirectoryError::Backend { code, message } => AuthError::Backend { code, message },
        })?;

        if !user.role.grants().contains_all(granted) {
            tracing::debug!(username, role = %user.role, "requested scopes exceed role");
            return Err(AuthError::InsufficientRole);
        }

        if !verify_password(password, &user.password_hash) {
            tracing::debug!(username, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.token_ttl)
                .map_err(|e| AuthError::Internal(e.to_string()))?;
        let claims = AccessClaims::new(
            user.user_id,
            user.username.clone(),
            user.role,
            granted,
            expires_at,
        );

        let token = self
            .codec
            .issue(&claims)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.sessions
            .put(user.user_id, &token, self.token_ttl)
            .await
            .map_err(|SessionStoreError::Unavailable(reason)| {
                tracing::error!(username, %reason, "session write failed during login");
                AuthError::CacheUnavailable(reason)
            })?;

        tracing::debug!(username, user_id = %user.user_id, scopes = %granted, "login succeeded");
        Ok(token)
    }
}

/// Validate a requested scope list against the closed vocabulary.
///
/// Empty requests and any unrecognized name are rejected outright; the
/// result is the *requested* set, before implication expansion.
fn parse_requested_scopes(requested: &[String]) -> AuthResult<ScopeSet> {
    if requested.is_empty() {
        return Err(AuthError::InvalidScopeRequest("no scopes requested".to_string()));
    }

    let mut set = ScopeSet::empty();
    for name in requested {
        match Scope::parse(name) {
            Some(scope) => set.insert(scope),
            None => return Err(AuthError::InvalidScopeRequest(name.clone())),
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use usergate_auth::{hash_password, Role};
    use usergate_core::UserId;

    use crate::directory::{InMemoryUserDirectory, NewUserRecord};
    use crate::session::InMemorySessionStore;

    const TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    struct Fixture {
        directory: Arc<InMemoryUserDirectory>,
        sessions: Arc<InMemorySessionStore>,
        authenticator: Authenticator,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let codec = Arc::new(TokenCodec::new(b"test-secret", "HS256").unwrap());
        let authenticator = Authenticator::new(
            directory.clone(),
            sessions.clone(),
            codec.clone(),
            TTL,
        );
        Fixture {
            directory,
            sessions,
            authenticator,
        }
    }

    async fn seed(fixture: &Fixture, username: &str, password: &str, role: Role) {
        fixture
            .directory
            .create_user(NewUserRecord {
                username: username.to_string(),
                password_hash: hash_password(password).unwrap(),
                name: username.to_string(),
                phone_number: format!("+1-555{username}"),
                role,
                email: None,
            })
            .await
            .unwrap();
    }

    fn scopes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn login_issues_token_with_requested_scopes_and_caches_it() {
        let fx = fixture();
        seed(&fx, "alice", "correct", Role::User).await;

        let token = fx
            .authenticator
            .login("alice", "correct", &scopes(&["USER"]))
            .await
            .unwrap();

        let codec = TokenCodec::new(b"test-secret", "HS256").unwrap();
        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::User);
        assert!(claims.scopes.contains(Scope::User));
        assert!(!claims.scopes.contains(Scope::Admin));

        let cached = fx.sessions.get(claims.user_id).await.unwrap();
        assert_eq!(cached.as_deref(), Some(token.as_str()));
    }

    #[tokio::test]
    async fn admin_request_grants_both_scopes() {
        let fx = fixture();
        seed(&fx, "root", "correct", Role::Admin).await;

        let token = fx
            .authenticator
            .login("root", "correct", &scopes(&["ADMIN"]))
            .await
            .unwrap();

        let codec = TokenCodec::new(b"test-secret", "HS256").unwrap();
        let claims = codec.decode(&token).unwrap();
        assert!(claims.scopes.contains(Scope::Admin));
        assert!(claims.scopes.contains(Scope::User));
    }

    #[tokio::test]
    async fn unknown_or_empty_scopes_are_rejected() {
        let fx = fixture();
        seed(&fx, "alice", "correct", Role::User).await;

        let err = fx
            .authenticator
            .login("alice", "correct", &scopes(&["ROOT"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidScopeRequest(_)));

        let err = fx
            .authenticator
            .login("alice", "correct", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidScopeRequest(_)));
    }

    #[tokio::test]
    async fn user_role_cannot_obtain_admin_scope() {
        let fx = fixture();
        seed(&fx, "alice", "correct", Role::User).await;

        let err = fx
            .authenticator
            .login("alice", "correct", &scopes(&["ADMIN"]))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InsufficientRole);

        // No token means no cache write either.
        let alice = fx.directory.get_user("alice").await.unwrap();
        assert_eq!(fx.sessions.get(alice.user_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_distinct_internally() {
        let fx = fixture();
        seed(&fx, "alice", "correct", Role::User).await;

        let err = fx
            .authenticator
            .login("alice", "wrong", &scopes(&["USER"]))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(err.is_login_rejection());

        let err = fx
            .authenticator
            .login("ghost", "whatever", &scopes(&["USER"]))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UserNotFound);
        assert!(err.is_login_rejection());
    }

    #[tokio::test]
    async fn second_login_supersedes_the_first_session() {
        let fx = fixture();
        seed(&fx, "alice", "correct", Role::User).await;

        let first = fx
            .authenticator
            .login("alice", "correct", &scopes(&["USER"]))
            .await
            .unwrap();
        let second = fx
            .authenticator
            .login("alice", "correct", &scopes(&["USER"]))
            .await
            .unwrap();

        let alice = fx.directory.get_user("alice").await.unwrap();
        let live = fx.sessions.get(alice.user_id).await.unwrap();
        assert_eq!(live.as_deref(), Some(second.as_str()));
        assert_ne!(first, second);
    }
}
