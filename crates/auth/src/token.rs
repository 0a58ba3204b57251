//! Signed-token encode/decode.
//!
//! Tokens are self-contained (signature and expiry validate without any
//! server-side state); *liveness* is tracked separately by the session
//! cache in `usergate-infra`.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::AccessClaims;

/// Rejected token-codec configuration (startup-time failure).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Token signing failed. Effectively unreachable for HMAC keys; surfaced
/// rather than panicking.
#[derive(Debug, Error)]
#[error("token signing failed")]
pub struct TokenSignError(#[source] jsonwebtoken::errors::Error);

/// A token failed validation.
///
/// All decode failures (bad signature, algorithm mismatch, expired,
/// malformed claims) collapse into this one opaque kind so callers cannot
/// distinguish *which* check failed. The precise cause is kept as the
/// error source for server-side logs only.
#[derive(Debug, Error)]
#[error("invalid token")]
pub struct TokenDecodeError(#[source] jsonwebtoken::errors::Error);

/// Encodes and validates access tokens with a process-wide secret.
///
/// Immutable after construction; safe to share across request tasks
/// without synchronization.
pub struct TokenCodec {
    header: Header,
    validation: Validation,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Build a codec from the configured secret and algorithm name
    /// (HS256, HS384 or HS512).
    pub fn new(secret: &[u8], algorithm: &str) -> Result<Self, TokenConfigError> {
        let algorithm = match algorithm {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => return Err(TokenConfigError::UnsupportedAlgorithm(other.to_string())),
        };

        let mut validation = Validation::new(algorithm);
        // Expiry is exact: a token is invalid the second `exp` passes.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            header: Header::new(algorithm),
            validation,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    /// Serialize and sign a claim set.
    pub fn issue(&self, claims: &AccessClaims) -> Result<String, TokenSignError> {
        jsonwebtoken::encode(&self.header, claims, &self.encoding_key).map_err(TokenSignError)
    }

    /// Verify signature, expiry and claim structure.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenDecodeError> {
        jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenDecodeError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, Scope, ScopeSet};
    use chrono::{Duration, Utc};
    use usergate_core::UserId;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(secret.as_bytes(), "HS256").unwrap()
    }

    fn claims_expiring_in(minutes: i64) -> AccessClaims {
        AccessClaims::new(
            UserId::new(42),
            "alice",
            Role::Admin,
            ScopeSet::from(Scope::Admin).expand(),
            Utc::now() + Duration::minutes(minutes),
        )
    }

    #[test]
    fn decode_returns_the_issued_claims() {
        let codec = codec("test-secret");
        let claims = claims_expiring_in(10);

        let token = codec.issue(&claims).unwrap();
        let decoded = codec.decode(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec("test-secret");
        let claims = claims_expiring_in(-10);

        let token = codec.issue(&claims).unwrap();
        assert!(codec.decode(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = codec("secret-a").issue(&claims_expiring_in(10)).unwrap();
        assert!(codec("secret-b").decode(&token).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec("test-secret");
        let token = codec.issue(&claims_expiring_in(10)).unwrap();

        // Flip a character inside the claims segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();

        assert!(codec.decode(&parts.join(".")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = codec("test-secret");
        assert!(codec.decode("not-a-token").is_err());
        assert!(codec.decode("").is_err());
    }

    #[test]
    fn algorithm_mismatch_is_rejected() {
        let hs256 = codec("test-secret");
        let hs384 = TokenCodec::new(b"test-secret", "HS384").unwrap();

        let token = hs384.issue(&claims_expiring_in(10)).unwrap();
        assert!(hs256.decode(&token).is_err());
        assert!(hs384.decode(&token).is_ok());
    }

    #[test]
    fn unsupported_algorithm_is_a_config_error() {
        assert!(matches!(
            TokenCodec::new(b"s", "RS256"),
            Err(TokenConfigError::UnsupportedAlgorithm(_))
        ));
    }
}
