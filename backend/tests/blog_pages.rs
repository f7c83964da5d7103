//! End-to-end behaviour of the blog pages over the in-memory store.

mod support;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use rstest::rstest;
use yatube::domain::PostDraft;
use yatube::domain::ports::{PostFilter, PostRepository};

use support::{Blog, get_page, post_cards, sign_in};

async fn post_count(blog: &Blog) -> u64 {
    blog.store.count(&PostFilter::All).await.expect("count posts")
}

#[actix_web::test]
async fn signed_in_author_creates_post() {
    let blog = Blog::new();
    blog.user("leo").await;
    let cats = blog.group("cats").await;
    let app = test::init_service(blog.app()).await;
    let cookie = sign_in(&app, "leo").await;
    let before = post_count(&blog).await;

    let group_id = cats.id().to_string();
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .cookie(cookie)
            .set_form([("text", "Fresh from the press"), ("group", group_id.as_str())])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers().get(header::LOCATION).expect("location"),
        "/profile/leo/"
    );
    assert_eq!(post_count(&blog).await, before + 1);

    let (_, group_page) = get_page(&app, "/group/cats/", None).await;
    assert!(group_page.contains("Fresh from the press"));
}

#[actix_web::test]
async fn anonymous_create_redirects_to_login() {
    let blog = Blog::new();
    let app = test::init_service(blog.app()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .set_form([("text", "Sneaky"), ("group", "")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers().get(header::LOCATION).expect("location"),
        "/auth/login/?next=/create/"
    );
    assert_eq!(post_count(&blog).await, 0);
}

#[actix_web::test]
async fn non_author_edit_is_rejected() {
    let blog = Blog::new();
    let leo = blog.user("leo").await;
    blog.user("anna").await;
    let post = blog.post(&leo, "Untouchable", None).await;
    let app = test::init_service(blog.app()).await;
    let cookie = sign_in(&app, "anna").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id()))
            .cookie(cookie)
            .set_form([("text", "Vandalised"), ("group", "")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers().get(header::LOCATION).expect("location"),
        format!("/posts/{}/", post.id()).as_str()
    );
    let stored = blog
        .store
        .find_by_id(post.id())
        .await
        .expect("lookup")
        .expect("post still exists");
    assert_eq!(stored.text().as_ref(), "Untouchable");
}

#[actix_web::test]
async fn author_edit_updates_post() {
    let blog = Blog::new();
    let leo = blog.user("leo").await;
    let post = blog.post(&leo, "Draft", None).await;
    let app = test::init_service(blog.app()).await;
    let cookie = sign_in(&app, "leo").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id()))
            .cookie(cookie)
            .set_form([("text", "Final"), ("group", "")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let (_, detail) = get_page(&app, &format!("/posts/{}/", post.id()), None).await;
    assert!(detail.contains("Final"));
    assert_eq!(post_count(&blog).await, 1);
}

#[actix_web::test]
async fn index_cache_survives_edits_until_cleared_or_expired() {
    let blog = Blog::new();
    let leo = blog.user("leo").await;
    let post = blog.post(&leo, "Before", None).await;
    let app = test::init_service(blog.app()).await;

    let (_, first) = get_page(&app, "/", None).await;
    let draft = PostDraft::from_form("After", "").expect("draft");
    blog.store.update(post.id(), &draft).await.expect("update");

    let (_, cached) = get_page(&app, "/", None).await;
    assert_eq!(first, cached);

    blog.clock.advance_seconds(20);
    let (_, expired) = get_page(&app, "/", None).await;
    assert!(expired.contains("After"));
}

#[actix_web::test]
async fn cached_index_is_per_viewer() {
    let blog = Blog::new();
    let leo = blog.user("leo").await;
    blog.post(&leo, "Hello", None).await;
    let app = test::init_service(blog.app()).await;

    let (_, anonymous) = get_page(&app, "/", None).await;
    assert!(anonymous.contains("Log in"));

    let cookie = sign_in(&app, "leo").await;
    let (_, signed_in) = get_page(&app, "/", Some(cookie)).await;
    assert!(signed_in.contains("Signed in as"));
}

#[rstest]
#[case("/", 10)]
#[case("/?page=2", 3)]
#[case("/group/cats/", 10)]
#[case("/group/cats/?page=2", 3)]
#[case("/profile/leo/", 10)]
#[case("/profile/leo/?page=2", 3)]
#[case("/profile/leo/?page=99", 3)]
#[case("/profile/leo/?page=abc", 10)]
#[actix_web::test]
async fn listings_paginate_by_ten(#[case] uri: &str, #[case] expected: usize) {
    let blog = Blog::new();
    let leo = blog.user("leo").await;
    let cats = blog.group("cats").await;
    for n in 0..13 {
        blog.post(&leo, &format!("Post {n}"), Some(&cats)).await;
    }
    let app = test::init_service(blog.app()).await;

    let (status, body) = get_page(&app, uri, None).await;
    assert_eq!(status, 200);
    assert_eq!(post_cards(&body), expected, "{uri}");
}

#[rstest]
#[case("/no/such/page/")]
#[case("/posts/12345/")]
#[case("/group/unknown/")]
#[actix_web::test]
async fn unknown_pages_are_not_found(#[case] uri: &str) {
    let blog = Blog::new();
    let app = test::init_service(blog.app()).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("trace-id"));
    let body = test::read_body(res).await;
    assert!(String::from_utf8_lossy(&body).contains("data-page=\"error\""));
}

#[actix_web::test]
async fn comment_flow() {
    let blog = Blog::new();
    let leo = blog.user("leo").await;
    blog.user("anna").await;
    let post = blog.post(&leo, "Talk to me", None).await;
    let app = test::init_service(blog.app()).await;
    let comment_uri = format!("/posts/{}/comment/", post.id());

    let anonymous = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&comment_uri)
            .set_form([("text", "drive-by")])
            .to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::FOUND);
    assert_eq!(
        anonymous.headers().get(header::LOCATION).expect("location"),
        format!("/auth/login/?next={comment_uri}").as_str()
    );

    let cookie = sign_in(&app, "anna").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&comment_uri)
            .cookie(cookie)
            .set_form([("text", "Lovely prose")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let (_, detail) = get_page(&app, &format!("/posts/{}/", post.id()), None).await;
    assert!(detail.contains("Lovely prose"));
    assert!(!detail.contains("drive-by"));
}

#[actix_web::test]
async fn follow_flow() {
    let blog = Blog::new();
    let leo = blog.user("leo").await;
    blog.user("anna").await;
    blog.user("ivan").await;
    blog.post(&leo, "For my followers", None).await;
    let app = test::init_service(blog.app()).await;

    let anna = sign_in(&app, "anna").await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/leo/follow/")
            .cookie(anna.clone())
            .to_request(),
    )
    .await;
    assert_eq!(
        res.headers().get(header::LOCATION).expect("location"),
        "/profile/leo/"
    );

    let (_, anna_feed) = get_page(&app, "/follow/", Some(anna.clone())).await;
    assert!(anna_feed.contains("For my followers"));

    let ivan = sign_in(&app, "ivan").await;
    let (_, ivan_feed) = get_page(&app, "/follow/", Some(ivan)).await;
    assert_eq!(post_cards(&ivan_feed), 0);

    let (_, profile) = get_page(&app, "/profile/leo/", Some(anna.clone())).await;
    assert!(profile.contains("/profile/leo/unfollow/"));

    test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/leo/unfollow/")
            .cookie(anna.clone())
            .to_request(),
    )
    .await;
    let (_, anna_feed) = get_page(&app, "/follow/", Some(anna)).await;
    assert_eq!(post_cards(&anna_feed), 0);
}
