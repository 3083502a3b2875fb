use std::str::FromStr;

use crate::auth::jwt::JwtConfig;
use crate::cache::CacheConfig;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS (`CORS_ORIGINS`, comma separated).
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Grace period for the queue forwarder to drain after the listener closes.
    pub shutdown_timeout_secs: u64,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub cache: CacheConfig,
}

/// Parses `key` when set, otherwise uses `default`. A malformed value aborts startup.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} has an invalid value: {raw:?}")),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

impl ServerConfig {
    /// Defaults suit a local setup: `0.0.0.0:3000`, the Vite dev origin,
    /// 30 second timeouts and ten pooled connections.
    pub fn from_env() -> Self {
        let origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_owned());

        Self {
            host: env_or("HOST", "0.0.0.0".to_owned()),
            port: env_or("PORT", 3000),
            cors_origins: split_origins(&origins),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            jwt: JwtConfig::from_env(),
            cache: CacheConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            split_origins(" https://kindquest.ru, ,http://localhost:5173,"),
            vec!["https://kindquest.ru", "http://localhost:5173"]
        );
    }

    #[test]
    fn unset_variable_falls_back() {
        assert_eq!(env_or("KINDQUEST_TEST_SURELY_UNSET_PORT", 3000u16), 3000);
    }
}
