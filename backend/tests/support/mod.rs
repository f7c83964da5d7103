//! Shared harness for the HTTP integration tests.
//!
//! Builds the full application (session, trace middleware, every route) over
//! the in-memory store and a clock-controlled page cache.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{Arc, Mutex};

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_http::Request;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use yatube::Trace;
use yatube::domain::ports::{GroupRepository, PostRepository, UserRegistration, UserRepository};
use yatube::domain::{
    FullName, Group, GroupSlug, NewGroup, Post, PostDraft, PostText, Repositories, User, Username,
};
use yatube::inbound::http::configure;
use yatube::inbound::http::state::{
    DEFAULT_PAGE_CACHE_TTL, HttpState, PageCacheSettings, ServiceAdapters,
};
use yatube::inbound::http::uploads::media_files;
use yatube::outbound::cache::InMemoryPageCache;
use yatube::outbound::media::FsMediaStore;
use yatube::outbound::memory::InMemoryBlog;
use yatube::outbound::password::BcryptPasswordHasher;

pub const PASSWORD: &str = "war-and-peace";
const COST: u32 = 4;

/// Clock the tests move forward by hand.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Mutex::new(Utc::now()))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.0.lock().expect("clock lock");
        *now += TimeDelta::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.utc().with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

pub struct Blog {
    pub store: Arc<InMemoryBlog>,
    pub cache: Arc<InMemoryPageCache>,
    pub clock: Arc<ManualClock>,
    pub media: tempfile::TempDir,
    state: HttpState,
    key: Key,
}

impl Blog {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBlog::new());
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(InMemoryPageCache::with_clock(clock.clone()));
        let media = tempfile::tempdir().expect("media dir");
        let state = HttpState::for_repositories(
            Repositories::shared(store.clone()),
            ServiceAdapters {
                hasher: Arc::new(BcryptPasswordHasher::new(COST)),
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
            clock,
            media,
            state,
            key: Key::generate(),
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(session)
            .wrap(Trace)
            .service(media_files(self.media.path().to_path_buf()))
            .configure(configure)
    }

    pub async fn user(&self, username: &str) -> User {
        let registration = UserRegistration {
            username: Username::new(username).expect("fixture username"),
            name: FullName::default(),
            email: None,
            password_hash: bcrypt::hash(PASSWORD, COST).expect("hash"),
        };
        UserRepository::create(self.store.as_ref(), &registration)
            .await
            .expect("create user")
    }

    pub async fn group(&self, slug: &str) -> Group {
        let group = NewGroup::try_new(
            &format!("Group {slug}"),
            GroupSlug::new(slug).expect("fixture slug"),
            "",
        )
        .expect("fixture group");
        GroupRepository::create(self.store.as_ref(), &group)
            .await
            .expect("create group")
    }

    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let draft = PostDraft::new(PostText::new(text).expect("text"), group.map(Group::id));
        PostRepository::create(self.store.as_ref(), author.id(), &draft)
            .await
            .expect("create post")
    }
}

pub async fn sign_in<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", username), ("password", PASSWORD)])
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("login sets a session cookie")
}

pub async fn get_page<S, B>(app: &S, uri: &str, cookie: Option<Cookie<'static>>) -> (u16, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut request = test::TestRequest::get().uri(uri);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie);
    }
    let res = test::call_service(app, request.to_request()).await;
    let status = res.status().as_u16();
    let body = test::read_body(res).await;
    (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
}

pub fn post_cards(body: &str) -> usize {
    body.matches("data-post-id=").count()
}
