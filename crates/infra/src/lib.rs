//! `usergate-infra` — adapters and orchestration for the gateway core.
//!
//! Session-cache and user-directory adapters live here, together with the
//! two orchestrators built on top of them: the [`Authenticator`] (login)
//! and the [`AccessGuard`] (per-request authorization). Client handles are
//! constructed once at startup and injected; nothing in this crate holds a
//! lazily-initialized global.

pub mod authenticator;
pub mod directory;
pub mod guard;
pub mod session;

pub use authenticator::Authenticator;
pub use directory::{
    DirectoryError, HttpUserDirectory, InMemoryUserDirectory, NewUserRecord, UserDirectory,
    UserInfoPatch, UserRecord,
};
pub use guard::AccessGuard;
pub use session::{InMemorySessionStore, RedisSessionStore, SessionStore, SessionStoreError};
