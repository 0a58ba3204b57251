use axum::Router;

pub mod auth;
pub mod common;
pub mod system;
pub mod user;

/// Router for all gateway endpoints except the health probe.
pub fn router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
}
