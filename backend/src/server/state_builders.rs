//! Builders wiring storage and cache adapters into the HTTP state.

use std::sync::Arc;

use tracing::warn;

use yatube::domain::Repositories;
use yatube::domain::ports::PageCache;
use yatube::inbound::http::state::{HttpState, PageCacheSettings, ServiceAdapters};
use yatube::outbound::cache::InMemoryPageCache;
use yatube::outbound::media::FsMediaStore;
use yatube::outbound::memory::InMemoryBlog;
use yatube::outbound::password::BcryptPasswordHasher;
use yatube::outbound::persistence::diesel_repositories;

use super::ServerConfig;

/// Diesel repositories when a pool is configured, otherwise an in-memory
/// store that is lost on restart.
fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => diesel_repositories(pool),
        None => {
            warn!("no database configured; blog data is kept in memory only");
            Repositories::shared(Arc::new(InMemoryBlog::new()))
        }
    }
}

fn build_page_cache(config: &ServerConfig) -> Arc<dyn PageCache> {
    config
        .page_cache
        .clone()
        .unwrap_or_else(|| Arc::new(InMemoryPageCache::new()))
}

/// Assemble the handler state.
///
/// # Errors
/// Returns [`std::io::Error`] when the page templates fail to compile.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    HttpState::for_repositories(
        build_repositories(config),
        ServiceAdapters {
            hasher: Arc::new(BcryptPasswordHasher::default()),
            media: Arc::new(FsMediaStore::new(config.media_dir.clone())),
        },
        PageCacheSettings {
            cache: build_page_cache(config),
            ttl: config.cache_ttl,
        },
    )
    .map_err(|err| std::io::Error::other(format!("failed to compile templates: {err}")))
}
