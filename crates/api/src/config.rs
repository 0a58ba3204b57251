//! Process configuration (environment, read once at startup).

use std::time::Duration;

/// Gateway configuration.
///
/// `token_ttl` is the single duration both the token `exp` claim and the
/// session-cache TTL derive from, so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret_key: String,
    pub algorithm: String,
    pub cache_url: String,
    pub userdata_url: String,
    pub userdata_timeout: Duration,
    pub token_ttl: Duration,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let secret_key = std::env::var("AUTH_SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("AUTH_SECRET_KEY not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self {
            secret_key,
            algorithm: env_or("AUTH_ALGORITHM", "HS256"),
            cache_url: env_or("CACHE_URL", "redis://127.0.0.1:6379"),
            userdata_url: env_or("USERDATA_URL", "http://127.0.0.1:3333"),
            userdata_timeout: Duration::from_secs(env_parsed("USERDATA_TIMEOUT_SECS", 5)),
            token_ttl: Duration::from_secs(env_parsed("TOKEN_TTL_DAYS", 7) * 24 * 60 * 60),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "not a number; using default {default}");
            default
        }),
        Err(_) => default,
    }
}
