//! Port interface for caching whole rendered pages.
use std::time::Duration;

use async_trait::async_trait;

use super::{PageCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by the page cache adapter.
    pub enum PageCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "page cache backend failure: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Read a cached page body, if present and not expired.
    async fn get(&self, key: &PageCacheKey) -> Result<Option<String>, PageCacheError>;

    /// Store `body` under `key` for `ttl`.
    async fn put(&self, key: &PageCacheKey, body: &str, ttl: Duration) -> Result<(), PageCacheError>;

    /// Drop every cached page.
    async fn clear(&self) -> Result<(), PageCacheError>;
}
