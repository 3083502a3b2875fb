use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use super::{Cache, CacheError};

/// [`Cache`] backed by a Redis server.
#[derive(Clone, Debug)]
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    /// Build a client for `url`. No connection is made until first use.
    pub fn open(url: &str) -> Result<Self, CacheError> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // Redis rejects a zero expiry.
        let secs = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, secs).await?;
        Ok(())
    }
}
