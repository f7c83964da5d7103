//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};

use crate::domain::ports::{GroupRepository, PostRepository, UserRegistration, UserRepository};
use crate::domain::{
    FullName, Group, GroupSlug, NewGroup, Post, PostDraft, PostText, Repositories, User, Username,
};
use crate::inbound::http::state::{
    DEFAULT_PAGE_CACHE_TTL, HttpState, PageCacheSettings, ServiceAdapters,
};
use crate::inbound::http::uploads::media_files;
use crate::outbound::cache::InMemoryPageCache;
use crate::outbound::media::FsMediaStore;
use crate::outbound::memory::InMemoryBlog;
use crate::outbound::password::BcryptPasswordHasher;

/// Password given to every seeded user.
pub const PASSWORD: &str = "war-and-peace";

/// Cheapest bcrypt cost, to keep tests fast.
const TEST_COST: u32 = 4;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// In-memory store, page cache, a throwaway media root and handler state
/// wired together.
pub struct TestBlog {
    pub store: Arc<InMemoryBlog>,
    pub cache: Arc<InMemoryPageCache>,
    pub media: tempfile::TempDir,
    pub state: HttpState,
}

impl TestBlog {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBlog::new());
        let cache = Arc::new(InMemoryPageCache::new());
        let media = tempfile::tempdir().expect("media dir");
        let state = HttpState::for_repositories(
            Repositories::shared(store.clone()),
            ServiceAdapters {
                hasher: Arc::new(BcryptPasswordHasher::new(TEST_COST)),
                media: Arc::new(FsMediaStore::new(media.path())),
            },
            PageCacheSettings {
                cache: cache.clone(),
                ttl: DEFAULT_PAGE_CACHE_TTL,
            },
        )
        .expect("templates compile");
        Self {
            store,
            cache,
            media,
            state,
        }
    }

    /// Full application with every route mounted.
    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(test_session_middleware())
            .service(media_files(self.media.path().to_path_buf()))
            .configure(crate::inbound::http::configure)
    }

    pub async fn user(&self, username: &str) -> User {
        let hash = bcrypt::hash(PASSWORD, TEST_COST).expect("hash password");
        let registration = UserRegistration {
            username: Username::new(username).expect("fixture username"),
            name: FullName::default(),
            email: None,
            password_hash: hash,
        };
        UserRepository::create(self.store.as_ref(), &registration)
            .await
            .expect("create user")
    }

    pub async fn group(&self, slug: &str) -> Group {
        let new_group = NewGroup::try_new(
            &format!("Group {slug}"),
            GroupSlug::new(slug).expect("fixture slug"),
            "fixture group",
        )
        .expect("fixture group");
        GroupRepository::create(self.store.as_ref(), &new_group)
            .await
            .expect("create group")
    }

    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let draft = PostDraft::new(
            PostText::new(text).expect("fixture text"),
            group.map(Group::id),
        );
        PostRepository::create(self.store.as_ref(), author.id(), &draft)
            .await
            .expect("create post")
    }
}

/// Log in through the form and return the session cookie.
pub async fn sign_in<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", username), ("password", PASSWORD), ("next", "/")])
            .to_request(),
    )
    .await;
    session_cookie(&res).expect("login sets a session cookie")
}

/// Read a response body as UTF-8.
pub async fn body_text<B: MessageBody>(res: ServiceResponse<B>) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

/// Number of rendered post cards in an HTML page.
pub fn post_cards(body: &str) -> usize {
    body.matches("data-post-id=").count()
}
