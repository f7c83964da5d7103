//! Post listings, the detail page and the authoring forms.
//!
//! ```text
//! GET  /                      newest posts (whole page cached)
//! GET  /group/{slug}/         posts in a group
//! GET  /profile/{username}/   posts by an author
//! GET  /posts/{id}/           one post with its comments
//! GET  /create/               new post form (login required)
//! GET  /posts/{id}/edit/      edit form (author only)
//! POST /posts/{id}/comment/   add a comment (login required)
//! GET  /follow/               posts by followed authors (login required)
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::{debug, warn};

use crate::domain::ports::PageCacheKey;
use crate::domain::{
    CommentDraft, EditOutcome, Error, FieldErrors, FormOutcome, Post, PostDraft, PostId, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::forms::{CommentForm, PageQuery, PostForm};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::html;
use crate::inbound::http::uploads::PostSubmission;
use crate::inbound::http::views::{
    CommentView, GroupView, PostView, UserView, base_context, current_viewer, form_errors,
    group_choices, insert_page, post_url, profile_url, redirect, request_target, require_viewer,
};

const POST_FORM_FIELDS: [&str; 3] = ["text", "group", "image"];

/// Parse a `{post_id}` path segment. Anything that is not a post id cannot
/// name a page, so it is a 404.
fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("no post with id {raw}")))
}

/// Newest posts. Whole rendered pages are cached per URL and viewer.
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let key = PageCacheKey::for_request(request_target(&req), viewer.as_ref().map(User::id));
    match state.page_cache.get(&key).await {
        Ok(Some(body)) => {
            debug!(key = %key, "serving cached page");
            return Ok(html(body));
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "page cache lookup failed; rendering uncached"),
    }

    let page = state.feeds.index(query.page()).await?;
    let mut context = base_context(viewer.as_ref());
    insert_page(&mut context, &req, page)?;
    let body = state.templates.render("posts/index.html", &context)?;

    if let Err(err) = state.page_cache.put(&key, &body, state.cache_ttl).await {
        warn!(error = %err, "failed to store rendered page");
    }
    Ok(html(body))
}

#[get("/group/{slug}/")]
pub async fn group_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let feed = state.feeds.group(&slug, query.page()).await?;
    let mut context = base_context(viewer.as_ref());
    context.insert("group", &GroupView::from(&feed.group));
    insert_page(&mut context, &req, feed.page)?;
    state.templates.page("posts/group_list.html", &context)
}

#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let feed = state
        .feeds
        .profile(&username, query.page(), viewer.as_ref().map(User::id))
        .await?;
    let can_follow = viewer
        .as_ref()
        .is_some_and(|viewer| viewer.id() != feed.author.id());

    let mut context = base_context(viewer.as_ref());
    context.insert("author", &UserView::from(&feed.author));
    context.insert("post_count", &feed.post_count);
    context.insert("following", &feed.following);
    context.insert("can_follow", &can_follow);
    insert_page(&mut context, &req, feed.page)?;
    state.templates.page("posts/profile.html", &context)
}

#[get("/posts/{post_id}/")]
pub async fn post_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    post_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&post_id)?;
    let viewer = current_viewer(&state, &session).await?;
    let detail = state.feeds.post_detail(id).await?;
    let can_edit = viewer
        .as_ref()
        .is_some_and(|viewer| detail.post.is_authored_by(viewer.id()));
    let comments: Vec<CommentView> = detail.comments.iter().map(CommentView::from).collect();

    let mut context = base_context(viewer.as_ref());
    context.insert("post", &PostView::from(&detail.post));
    context.insert("author_post_count", &detail.author_post_count);
    context.insert("comments", &comments);
    context.insert("can_edit", &can_edit);
    state.templates.page("posts/post_detail.html", &context)
}

/// Render the post form, for either a new post or an edit of `editing`.
async fn render_post_form(
    state: &HttpState,
    viewer: &User,
    form: &PostForm,
    errors: &FieldErrors,
    editing: Option<PostId>,
) -> ApiResult<HttpResponse> {
    let groups = state.posts.group_choices().await?;
    let action = editing.map_or_else(|| "/create/".to_owned(), |id| format!("/posts/{id}/edit/"));

    let mut context = base_context(Some(viewer));
    context.insert("form", form);
    context.insert("groups", &group_choices(&groups, &form.group));
    context.insert("errors", &form_errors(&POST_FORM_FIELDS, errors));
    context.insert("is_edit", &editing.is_some());
    context.insert("action", &action);
    state.templates.page("posts/create_post.html", &context)
}

fn form_for(post: &Post) -> PostForm {
    PostForm {
        text: post.text().as_ref().to_owned(),
        group: post
            .group()
            .map(|group| group.id().to_string())
            .unwrap_or_default(),
    }
}

#[get("/create/")]
pub async fn post_create_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let viewer = require_viewer(&state, &session, request_target(&req)).await?;
    render_post_form(&state, &viewer, &PostForm::default(), &FieldErrors::new(), None).await
}

/// Publish a post, then show the author's profile.
#[post("/create/")]
pub async fn post_create(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let viewer = require_viewer(&state, &session, request_target(&req)).await?;
    let (form, draft) = PostSubmission::read(&req, body).await?.into_draft();
    let draft = match draft {
        Ok(draft) => draft,
        Err(errors) => return render_post_form(&state, &viewer, &form, &errors, None).await,
    };
    match state.posts.create(viewer.id(), draft).await? {
        FormOutcome::Saved(_) => Ok(redirect(&profile_url(&viewer))),
        FormOutcome::Invalid(errors) => render_post_form(&state, &viewer, &form, &errors, None).await,
    }
}

#[get("/posts/{post_id}/edit/")]
pub async fn post_edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    post_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&post_id)?;
    let viewer = require_viewer(&state, &session, request_target(&req)).await?;
    match state.posts.editable(viewer.id(), id).await? {
        Some(post) => {
            render_post_form(&state, &viewer, &form_for(&post), &FieldErrors::new(), Some(id))
                .await
        }
        None => Ok(redirect(&post_url(id))),
    }
}

/// Save an edit. Anyone but the author is sent back to the post untouched.
#[post("/posts/{post_id}/edit/")]
pub async fn post_edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    post_id: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&post_id)?;
    let viewer = require_viewer(&state, &session, request_target(&req)).await?;
    let (form, draft) = PostSubmission::read(&req, body).await?.into_draft();
    let draft = match draft {
        Ok(draft) => draft,
        Err(errors) => {
            // Non-authors must not learn anything from validation messages.
            if state.posts.editable(viewer.id(), id).await?.is_none() {
                return Ok(redirect(&post_url(id)));
            }
            return render_post_form(&state, &viewer, &form, &errors, Some(id)).await;
        }
    };
    match state.posts.edit(viewer.id(), id, draft).await? {
        EditOutcome::Saved(_) | EditOutcome::NotAuthor => Ok(redirect(&post_url(id))),
        EditOutcome::Invalid(errors) => {
            render_post_form(&state, &viewer, &form, &errors, Some(id)).await
        }
    }
}

/// Add a comment and return to the post. A blank comment is dropped.
#[post("/posts/{post_id}/comment/")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    post_id: web::Path<String>,
    form: web::Form<CommentForm>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&post_id)?;
    let viewer = require_viewer(&state, &session, request_target(&req)).await?;
    match CommentDraft::from_form(&form.text) {
        Ok(draft) => {
            state.posts.add_comment(viewer.id(), id, draft).await?;
        }
        Err(_) => {
            // Still a 404 for a missing post.
            state.feeds.post_detail(id).await?;
            debug!(post_id = %id, "blank comment ignored");
        }
    }
    Ok(redirect(&post_url(id)))
}

#[get("/follow/")]
pub async fn follow_index(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = require_viewer(&state, &session, request_target(&req)).await?;
    let page = state.feeds.follow_feed(viewer.id(), query.page()).await?;
    let mut context = base_context(Some(&viewer));
    insert_page(&mut context, &req, page)?;
    state.templates.page("posts/follow.html", &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{PageCache, PostFilter, PostRepository};
    use crate::domain::image::fixtures::TINY_GIF;
    use crate::inbound::http::test_utils::{TestBlog, body_text, post_cards, sign_in};
    use crate::inbound::http::uploads::test_support::{content_type, multipart_body};
    use actix_web::http::{StatusCode, header};
    use actix_web::test;
    use rstest::rstest;

    fn location<B>(res: &actix_web::dev::ServiceResponse<B>) -> &str {
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("location header")
    }

    #[actix_web::test]
    async fn create_publishes_and_redirects_to_profile() {
        let blog = TestBlog::new();
        blog.user("leo").await;
        let app = test::init_service(blog.app()).await;
        let cookie = sign_in(&app, "leo").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/create/")
                .cookie(cookie)
                .set_form([("text", "A new chapter"), ("group", "")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/profile/leo/");
        assert_eq!(blog.store.count(&PostFilter::All).await.expect("count"), 1);
    }

    #[actix_web::test]
    async fn create_with_unknown_group_rerenders_form() {
        let blog = TestBlog::new();
        blog.user("leo").await;
        let app = test::init_service(blog.app()).await;
        let cookie = sign_in(&app, "leo").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/create/")
                .cookie(cookie)
                .set_form([("text", "Lost"), ("group", "42")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_text(res).await;
        assert!(body.contains("class=\"errorlist\""), "{body}");
        assert_eq!(blog.store.count(&PostFilter::All).await.expect("count"), 0);
    }

    #[actix_web::test]
    async fn created_post_image_is_stored_and_served() {
        let blog = TestBlog::new();
        blog.user("leo").await;
        let app = test::init_service(blog.app()).await;
        let cookie = sign_in(&app, "leo").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/create/")
                .cookie(cookie)
                .insert_header((header::CONTENT_TYPE, content_type()))
                .set_payload(multipart_body(
                    &[("text", "With a picture"), ("group", "")],
                    Some(("cat.gif", TINY_GIF)),
                ))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);

        let post = blog
            .store
            .find_by_id(PostId::new(1).expect("id"))
            .await
            .expect("lookup")
            .expect("post saved");
        let image = post.image().expect("image recorded");
        assert!(image.starts_with("posts/") && image.ends_with(".gif"), "{image}");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/media/{image}"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await.as_ref(), TINY_GIF);
    }

    #[actix_web::test]
    async fn non_image_upload_rerenders_form_with_error() {
        let blog = TestBlog::new();
        blog.user("leo").await;
        let app = test::init_service(blog.app()).await;
        let cookie = sign_in(&app, "leo").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/create/")
                .cookie(cookie)
                .insert_header((header::CONTENT_TYPE, content_type()))
                .set_payload(multipart_body(
                    &[("text", "Keep me"), ("group", "")],
                    Some(("cat.gif", &b"not really a gif"[..])),
                ))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_text(res).await;
        assert!(body.contains("upload a valid image"), "{body}");
        assert!(body.contains("Keep me"), "{body}");
        assert_eq!(blog.store.count(&PostFilter::All).await.expect("count"), 0);
    }

    #[actix_web::test]
    async fn edit_without_new_file_keeps_the_image() {
        let blog = TestBlog::new();
        let leo = blog.user("leo").await;
        let post = blog.post(&leo, "Before", None).await;
        let draft = PostDraft::from_form("Before", "")
            .expect("draft")
            .with_image(Some("posts/old.gif".to_owned()));
        blog.store.update(post.id(), &draft).await.expect("update");
        let app = test::init_service(blog.app()).await;
        let cookie = sign_in(&app, "leo").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/posts/{}/edit/", post.id()))
                .cookie(cookie)
                .insert_header((header::CONTENT_TYPE, content_type()))
                .set_payload(multipart_body(
                    &[("text", "After"), ("group", "")],
                    Some(("", &b""[..])),
                ))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        let saved = blog
            .store
            .find_by_id(post.id())
            .await
            .expect("lookup")
            .expect("post exists");
        assert_eq!(saved.text().as_ref(), "After");
        assert_eq!(saved.image(), Some("posts/old.gif"));
    }

    #[actix_web::test]
    async fn edit_form_redirects_non_authors() {
        let blog = TestBlog::new();
        let leo = blog.user("leo").await;
        blog.user("anna").await;
        let post = blog.post(&leo, "Mine", None).await;
        let app = test::init_service(blog.app()).await;
        let cookie = sign_in(&app, "anna").await;

        let uri = format!("/posts/{}/edit/", post.id());
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(&uri).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), format!("/posts/{}/", post.id()));
    }

    #[actix_web::test]
    async fn author_edit_keeps_the_form_prefilled() {
        let blog = TestBlog::new();
        let leo = blog.user("leo").await;
        let cats = blog.group("cats").await;
        let post = blog.post(&leo, "Whiskers", Some(&cats)).await;
        let app = test::init_service(blog.app()).await;
        let cookie = sign_in(&app, "leo").await;

        let uri = format!("/posts/{}/edit/", post.id());
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(&uri).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_text(res).await;
        assert!(body.contains("Whiskers"));
        assert!(body.contains(" selected>Group cats"), "{body}");
    }

    #[rstest]
    #[case("/posts/abc/")]
    #[case("/posts/0/")]
    #[case("/posts/999/")]
    #[case("/group/missing/")]
    #[case("/profile/nobody/")]
    #[actix_web::test]
    async fn missing_resources_are_not_found(#[case] uri: &str) {
        let blog = TestBlog::new();
        let app = test::init_service(blog.app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn detail_lists_comments_oldest_first() {
        let blog = TestBlog::new();
        let leo = blog.user("leo").await;
        let post = blog.post(&leo, "Discuss", None).await;
        let app = test::init_service(blog.app()).await;
        let cookie = sign_in(&app, "leo").await;

        for text in ["first!", "second"] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&format!("/posts/{}/comment/", post.id()))
                    .cookie(cookie.clone())
                    .set_form([("text", text)])
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::FOUND);
        }

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/posts/{}/", post.id()))
                .to_request(),
        )
        .await;
        let body = body_text(res).await;
        let first = body.find("first!").expect("first comment");
        let second = body.find("second").expect("second comment");
        assert!(first < second);
    }

    #[actix_web::test]
    async fn index_serves_cached_page_until_cleared() {
        let blog = TestBlog::new();
        let leo = blog.user("leo").await;
        let post = blog.post(&leo, "Original text", None).await;
        let app = test::init_service(blog.app()).await;

        let first = body_text(
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await,
        )
        .await;
        let draft = PostDraft::from_form("Edited text", "").expect("draft");
        blog.store.update(post.id(), &draft).await.expect("update");

        let cached = body_text(
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await,
        )
        .await;
        assert_eq!(first, cached);

        blog.cache.clear().await.expect("clear");
        let fresh = body_text(
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await,
        )
        .await;
        assert!(fresh.contains("Edited text"));
        assert_eq!(post_cards(&fresh), 1);
    }

    #[actix_web::test]
    async fn follow_feed_requires_login() {
        let blog = TestBlog::new();
        let app = test::init_service(blog.app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/follow/?page=2").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/auth/login/?next=/follow/%3Fpage%3D2");
    }
}
