//! Application settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use yatube::domain::ports::PageCache;
use yatube::inbound::http::session_config::SessionSettings;
use yatube::inbound::http::state::DEFAULT_PAGE_CACHE_TTL;
use yatube::outbound::persistence::{DEFAULT_CHECKOUT_TIMEOUT, DbPool};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_POOL_SIZE: u32 = 10;
const DEFAULT_REDIS_POOL_SIZE: u32 = 8;
const DEFAULT_REDIS_TIMEOUT: Duration = Duration::from_millis(250);
const DEFAULT_MEDIA_DIR: &str = "media";

/// Process settings loaded from `YATUBE_*` variables, config files and
/// command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "YATUBE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one, posts live in memory.
    pub database_url: Option<String>,
    /// Maximum database connections.
    pub db_pool_size: Option<u32>,
    /// Milliseconds a request waits for a database connection.
    pub db_timeout_ms: Option<u64>,
    /// Redis URL for a page cache shared between instances.
    pub redis_url: Option<String>,
    /// Maximum Redis connections.
    pub redis_pool_size: Option<u32>,
    /// Milliseconds a page request waits for Redis before skipping the cache.
    pub redis_timeout_ms: Option<u64>,
    /// Seconds a rendered index page stays cached.
    pub cache_ttl_secs: Option<u64>,
    /// Directory holding uploaded post images, served at `/media/`.
    pub media_dir: Option<PathBuf>,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw}: {err}"),
            )
        })
    }

    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE)
    }

    pub fn db_timeout(&self) -> Duration {
        self.db_timeout_ms
            .map_or(DEFAULT_CHECKOUT_TIMEOUT, Duration::from_millis)
    }

    pub fn redis_pool_size(&self) -> u32 {
        self.redis_pool_size.unwrap_or(DEFAULT_REDIS_POOL_SIZE)
    }

    pub fn redis_timeout(&self) -> Duration {
        self.redis_timeout_ms
            .map_or(DEFAULT_REDIS_TIMEOUT, Duration::from_millis)
    }

    pub fn media_dir(&self) -> PathBuf {
        self.media_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR))
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map_or(DEFAULT_PAGE_CACHE_TTL, Duration::from_secs)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) page_cache: Option<Arc<dyn PageCache>>,
    pub(crate) cache_ttl: Duration,
    pub(crate) media_dir: PathBuf,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            page_cache: None,
            cache_ttl: DEFAULT_PAGE_CACHE_TTL,
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
        }
    }

    /// Store blog data in PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the per-process page cache, e.g. with Redis.
    #[must_use]
    pub fn with_page_cache(mut self, cache: Arc<dyn PageCache>) -> Self {
        self.page_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Store and serve uploaded images from `dir`.
    #[must_use]
    pub fn with_media_dir(mut self, dir: PathBuf) -> Self {
        self.media_dir = dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "YATUBE_BIND_ADDR",
        "YATUBE_DATABASE_URL",
        "YATUBE_DB_POOL_SIZE",
        "YATUBE_DB_TIMEOUT_MS",
        "YATUBE_REDIS_URL",
        "YATUBE_REDIS_POOL_SIZE",
        "YATUBE_REDIS_TIMEOUT_MS",
        "YATUBE_CACHE_TTL_SECS",
        "YATUBE_MEDIA_DIR",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("yatube")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("socket address")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.db_pool_size(), DEFAULT_DB_POOL_SIZE);
        assert_eq!(settings.db_timeout(), Duration::from_secs(5));
        assert_eq!(settings.redis_timeout(), Duration::from_millis(250));
        assert_eq!(settings.cache_ttl(), Duration::from_secs(20));
        assert_eq!(settings.media_dir(), PathBuf::from("media"));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("YATUBE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("YATUBE_DATABASE_URL", Some("postgres://localhost/yatube".to_owned())),
            ("YATUBE_DB_POOL_SIZE", Some("3".to_owned())),
            ("YATUBE_DB_TIMEOUT_MS", Some("1500".to_owned())),
            ("YATUBE_REDIS_URL", None),
            ("YATUBE_REDIS_POOL_SIZE", None),
            ("YATUBE_REDIS_TIMEOUT_MS", Some("50".to_owned())),
            ("YATUBE_CACHE_TTL_SECS", Some("5".to_owned())),
            ("YATUBE_MEDIA_DIR", Some("/var/lib/yatube/media".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("socket address")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/yatube")
        );
        assert_eq!(settings.db_pool_size(), 3);
        assert_eq!(settings.db_timeout(), Duration::from_millis(1500));
        assert_eq!(settings.redis_timeout(), Duration::from_millis(50));
        assert_eq!(settings.cache_ttl(), Duration::from_secs(5));
        assert_eq!(settings.media_dir(), PathBuf::from("/var/lib/yatube/media"));
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        let _guard = lock_env(VARS.map(|name| {
            (name, (name == "YATUBE_BIND_ADDR").then(|| "not-an-address".to_owned()))
        }));

        let settings = load_from_empty_args();
        assert!(settings.bind_addr().is_err());
    }
}
