//! Redis-backed page cache shared between server instances.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::AsyncCommands;
use tracing::debug;

use crate::domain::ports::{PAGE_CACHE_PREFIX, PageCache, PageCacheError, PageCacheKey};

/// Page cache storing bodies as Redis strings with a per-key expiry.
#[derive(Clone)]
pub struct RedisPageCache {
    pool: Pool<RedisConnectionManager>,
}

fn backend_error(err: impl std::fmt::Display) -> PageCacheError {
    PageCacheError::backend(err.to_string())
}

impl RedisPageCache {
    /// Build a connection pool for `redis_url`.
    ///
    /// `checkout_timeout` bounds how long a page request waits for Redis
    /// before the page is served uncached.
    ///
    /// # Errors
    /// Returns [`PageCacheError::Backend`] when the URL is invalid or the
    /// pool cannot be built.
    pub async fn connect(
        redis_url: &str,
        max_size: u32,
        checkout_timeout: Duration,
    ) -> Result<Self, PageCacheError> {
        let manager = RedisConnectionManager::new(redis_url).map_err(backend_error)?;
        let pool = Pool::builder()
            .max_size(max_size)
            .connection_timeout(checkout_timeout)
            .build(manager)
            .await
            .map_err(backend_error)?;
        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, PageCacheError> {
        self.pool.get().await.map_err(backend_error)
    }
}

#[async_trait]
impl PageCache for RedisPageCache {
    async fn get(&self, key: &PageCacheKey) -> Result<Option<String>, PageCacheError> {
        let mut conn = self.connection().await?;
        let body: Option<String> = conn
            .get(key.as_str())
            .await
            .map_err(backend_error)?;
        Ok(body)
    }

    async fn put(&self, key: &PageCacheKey, body: &str, ttl: Duration) -> Result<(), PageCacheError> {
        let mut conn = self.connection().await?;
        // SETEX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key.as_str(), body, seconds)
            .await
            .map_err(backend_error)
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn
            .keys(format!("{PAGE_CACHE_PREFIX}*"))
            .await
            .map_err(backend_error)?;
        debug!(count = keys.len(), "clearing cached pages");
        if keys.is_empty() {
            return Ok(());
        }
        conn.del::<_, ()>(keys).await.map_err(backend_error)
    }
}
