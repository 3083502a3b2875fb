//! Read-through cache for hot list endpoints.
//!
//! Values are stored as JSON strings under fixed keys (see
//! [`kindquest_core::cache_keys`]) with a fixed TTL and are never invalidated
//! on writes. The cache is never a hard dependency: any backend failure is
//! logged and the read falls through to the loader.

mod memory;
mod redis;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

/// Default entry lifetime in seconds.
const DEFAULT_TTL_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(#[from] ::redis::RedisError),
}

/// Minimal string key/value store with per-entry expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Cache connection settings.
///
/// | Env var          | Default |
/// |------------------|---------|
/// | `CACHE_HOST`     | (unset: in-process cache) |
/// | `CACHE_PORT`     | `6379`  |
/// | `CACHE_PASSWORD` | (none)  |
/// | `CACHE_DB`       | `0`     |
/// | `CACHE_TTL_SECS` | `5`     |
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub host: Option<String>,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 6379,
            password: None,
            db: 0,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("CACHE_PORT")
            .unwrap_or_else(|_| "6379".into())
            .parse()
            .expect("CACHE_PORT must be a valid u16");

        let db: i64 = std::env::var("CACHE_DB")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("CACHE_DB must be a valid i64");

        let ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .expect("CACHE_TTL_SECS must be a valid u64");

        Self {
            host: std::env::var("CACHE_HOST").ok().filter(|s| !s.is_empty()),
            port,
            password: std::env::var("CACHE_PASSWORD").ok().filter(|s| !s.is_empty()),
            db,
            ttl_secs,
        }
    }

    /// Connection URL for the configured Redis server, if any.
    pub fn redis_url(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        let auth = match &self.password {
            Some(password) => format!(":{password}@"),
            None => String::new(),
        };
        Some(format!("redis://{auth}{host}:{}/{}", self.port, self.db))
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Return the cached value under `key`, or run `loader`, store its result
/// for `ttl` and return it.
///
/// Cache read, decode and write failures are logged at `warn` and never
/// surface to the caller; only `loader` errors do.
pub async fn read_through<T, E, F, Fut>(
    cache: &dyn Cache,
    key: &str,
    ttl: Duration,
    loader: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                tracing::debug!(key, "Cache hit");
                return Ok(value);
            }
            Err(e) => tracing::warn!(key, error = %e, "Discarding undecodable cache entry"),
        },
        Ok(None) => tracing::debug!(key, "Cache miss"),
        Err(e) => tracing::warn!(key, error = %e, "Cache read failed"),
    }

    let value = loader().await?;

    match serde_json::to_string(&value) {
        Ok(raw) => {
            if let Err(e) = cache.set_ex(key, &raw, ttl).await {
                tracing::warn!(key, error = %e, "Cache write failed");
            }
        }
        Err(e) => tracing::warn!(key, error = %e, "Failed to encode value for cache"),
    }

    Ok(value)
}
