//! `usergate-api` — HTTP surface of the user-management gateway.
//!
//! Thin translation layer: route handlers extract the bearer token, ask
//! the access guard for a caller identity, proxy the operation, and map
//! every failure through one error translation.

pub mod app;
pub mod config;
