//! Password hashing and verification (Argon2, PHC string format).

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    #[error("failed to gather salt entropy: {0}")]
    Entropy(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash a plaintext password into a PHC-format string with a fresh
/// random salt. Used before a password ever leaves the gateway for the
/// user-data service.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordHashError::Entropy(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordHashError::Hash(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordHashError::Hash(e.to_string()))?
        .to_string();

    Ok(phc)
}

/// Check a plaintext password against a stored PHC hash.
///
/// The comparison runs the full hash regardless of where a mismatch
/// occurs; a malformed stored hash verifies as `false` rather than
/// erroring (a bad hash in the directory is a data bug, not a caller
/// condition).
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(verify_password("s3cret-pass", &hash));
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(!verify_password("other-pass", &hash));
    }

    #[test]
    fn malformed_hash_fails_closed() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
