//! Yatube server entry-point: loads settings, prepares storage and serves
//! the blog pages.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use yatube::inbound::http::health::HealthState;
use yatube::inbound::http::session_config::{BuildMode, session_settings_from_env};
use yatube::outbound::cache::RedisPageCache;
use yatube::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| io::Error::other(format!("invalid session configuration: {e}")))?;

    let media_dir = settings.media_dir();
    tokio::fs::create_dir_all(&media_dir).await.map_err(|e| {
        io::Error::other(format!("failed to create media dir {}: {e}", media_dir.display()))
    })?;
    let mut config = ServerConfig::new(session, settings.bind_addr()?)
        .with_cache_ttl(settings.cache_ttl())
        .with_media_dir(media_dir);

    if let Some(database_url) = settings.database_url.as_deref() {
        let applied = run_pending_migrations(database_url)
            .await
            .map_err(|e| io::Error::other(format!("migrations failed: {e}")))?;
        info!(applied, "database schema up to date");
        let pool_config = PoolConfig::new(database_url, settings.db_pool_size())
            .with_checkout_timeout(settings.db_timeout());
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| io::Error::other(format!("failed to create database pool: {e}")))?;
        config = config.with_db_pool(pool);
    }

    if let Some(redis_url) = settings.redis_url.as_deref() {
        let cache = RedisPageCache::connect(
            redis_url,
            settings.redis_pool_size(),
            settings.redis_timeout(),
        )
        .await
        .map_err(|e| io::Error::other(format!("failed to connect page cache: {e}")))?;
        info!("using redis page cache");
        config = config.with_page_cache(Arc::new(cache));
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
