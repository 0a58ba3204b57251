//! `usergate-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: scope and
//! role policy, the claims model, token encode/decode and password hashing
//! live here; session liveness and user lookup live in `usergate-infra`.

pub mod claims;
pub mod identity;
pub mod password;
pub mod roles;
pub mod scope;
pub mod token;

pub use claims::AccessClaims;
pub use identity::CallerIdentity;
pub use password::{hash_password, verify_password, PasswordHashError};
pub use roles::Role;
pub use scope::{Scope, ScopeSet};
pub use token::{TokenCodec, TokenConfigError, TokenDecodeError, TokenSignError};
