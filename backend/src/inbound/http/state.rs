//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{
    FeedQuery, FollowCommand, LoginService, MediaStore, PageCache, PasswordHasher, PostCommand,
    SignupService, UsersQuery,
};
use crate::domain::{AccountService, FeedService, FollowService, PostService, Repositories};
use crate::inbound::http::templates::Templates;

/// Lifetime of a cached index page.
pub const DEFAULT_PAGE_CACHE_TTL: Duration = Duration::from_secs(20);

/// Driven adapters the services need besides the repositories.
#[derive(Clone)]
pub struct ServiceAdapters {
    pub hasher: Arc<dyn PasswordHasher>,
    pub media: Arc<dyn MediaStore>,
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub feeds: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub follows: Arc<dyn FollowCommand>,
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
    pub users: Arc<dyn UsersQuery>,
}

impl HttpStatePorts {
    /// Wire the domain services over one set of driven adapters.
    pub fn from_adapters(repos: Repositories, adapters: ServiceAdapters) -> Self {
        let ServiceAdapters { hasher, media } = adapters;
        let accounts = Arc::new(AccountService::new(repos.users.clone(), hasher));
        Self {
            feeds: Arc::new(FeedService::new(repos.clone())),
            posts: Arc::new(PostService::new(repos.clone(), media)),
            follows: Arc::new(FollowService::new(repos)),
            login: accounts.clone(),
            signup: accounts.clone(),
            users: accounts,
        }
    }
}

/// Where rendered index pages are kept, and for how long.
#[derive(Clone)]
pub struct PageCacheSettings {
    pub cache: Arc<dyn PageCache>,
    pub ttl: Duration,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub feeds: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub follows: Arc<dyn FollowCommand>,
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
    pub users: Arc<dyn UsersQuery>,
    pub page_cache: Arc<dyn PageCache>,
    pub cache_ttl: Duration,
    pub templates: Arc<Templates>,
}

impl HttpState {
    /// Construct state from ports, cache settings and compiled templates.
    pub fn new(ports: HttpStatePorts, cache: PageCacheSettings, templates: Arc<Templates>) -> Self {
        let HttpStatePorts {
            feeds,
            posts,
            follows,
            login,
            signup,
            users,
        } = ports;
        Self {
            feeds,
            posts,
            follows,
            login,
            signup,
            users,
            page_cache: cache.cache,
            cache_ttl: cache.ttl,
            templates,
        }
    }

    /// Build the full state over `repos`, compiling the templates.
    ///
    /// # Errors
    /// Returns the Tera error when the embedded templates fail to compile.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use yatube::domain::Repositories;
    /// use yatube::inbound::http::state::{
    ///     DEFAULT_PAGE_CACHE_TTL, HttpState, PageCacheSettings, ServiceAdapters,
    /// };
    /// use yatube::outbound::cache::InMemoryPageCache;
    /// use yatube::outbound::media::FsMediaStore;
    /// use yatube::outbound::memory::InMemoryBlog;
    /// use yatube::outbound::password::BcryptPasswordHasher;
    ///
    /// let state = HttpState::for_repositories(
    ///     Repositories::shared(Arc::new(InMemoryBlog::new())),
    ///     ServiceAdapters {
    ///         hasher: Arc::new(BcryptPasswordHasher::default()),
    ///         media: Arc::new(FsMediaStore::new("media")),
    ///     },
    ///     PageCacheSettings {
    ///         cache: Arc::new(InMemoryPageCache::new()),
    ///         ttl: DEFAULT_PAGE_CACHE_TTL,
    ///     },
    /// )
    /// .expect("templates compile");
    /// let _feeds = state.feeds.clone();
    /// ```
    pub fn for_repositories(
        repos: Repositories,
        adapters: ServiceAdapters,
        cache: PageCacheSettings,
    ) -> Result<Self, tera::Error> {
        let templates = Arc::new(Templates::new()?);
        Ok(Self::new(
            HttpStatePorts::from_adapters(repos, adapters),
            cache,
            templates,
        ))
    }
}
