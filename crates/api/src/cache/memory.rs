use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Cache, CacheError};

/// In-process [`Cache`] used when no Redis host is configured.
///
/// Expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((value, expires_at)) if *expires_at > Instant::now() => {
                    return Ok(Some(value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }
        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }
}
