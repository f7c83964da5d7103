//! Per-process page cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{PageCache, PageCacheError, PageCacheKey};

struct Entry {
    body: String,
    expires_at: DateTime<Utc>,
}

/// Page cache keeping rendered bodies in a `HashMap`.
///
/// Expired entries are dropped lazily on lookup.
pub struct InMemoryPageCache {
    entries: Mutex<HashMap<PageCacheKey, Entry>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryPageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPageCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<PageCacheKey, Entry>>, PageCacheError> {
        self.entries
            .lock()
            .map_err(|_| PageCacheError::backend("page cache lock poisoned"))
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, key: &PageCacheKey) -> Result<Option<String>, PageCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        let lookup = entries
            .get(key)
            .map(|entry| (entry.expires_at > now).then(|| entry.body.clone()));
        match lookup {
            Some(Some(body)) => Ok(Some(body)),
            Some(None) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &PageCacheKey, body: &str, ttl: Duration) -> Result<(), PageCacheError> {
        let ttl = TimeDelta::from_std(ttl).map_err(|err| PageCacheError::backend(err.to_string()))?;
        let expires_at = self.clock.utc() + ttl;
        self.lock()?.insert(
            key.clone(),
            Entry {
                body: body.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        self.lock()?.clear();
        Ok(())
    }
}
