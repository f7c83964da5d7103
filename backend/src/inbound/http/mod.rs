//! HTTP inbound adapter serving the blog's HTML pages.

pub mod about;
pub mod auth;
pub mod error;
pub mod follow;
pub mod forms;
pub mod health;
pub mod posts;
pub mod session;
pub mod session_config;
pub mod state;
pub mod templates;
pub mod uploads;
#[cfg(test)]
pub mod test_utils;
pub mod views;

use actix_web::web;

use crate::domain::Error;
pub use error::ApiResult;

/// Register every page route, the form and query error handlers, and the
/// HTML 404 fallback.
///
/// Uploaded images are served separately; mount [`uploads::media_files`]
/// before this.
///
/// Expects [`state::HttpState`] as app data and a session middleware around
/// the app.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
///
/// let app = App::new().configure(yatube::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed form submission: {err}")).into()
    }))
    .app_data(web::PayloadConfig::new(uploads::POST_BODY_LIMIT))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    }))
    .service(posts::index)
    .service(posts::group_posts)
    .service(follow::profile_follow)
    .service(follow::profile_unfollow)
    .service(posts::profile)
    .service(posts::post_create_form)
    .service(posts::post_create)
    .service(posts::post_edit_form)
    .service(posts::post_edit)
    .service(posts::add_comment)
    .service(posts::post_detail)
    .service(posts::follow_index)
    .service(auth::login_form)
    .service(auth::login)
    .service(auth::logout)
    .service(auth::signup_form)
    .service(auth::signup)
    .service(about::author)
    .service(about::tech)
    .default_service(web::to(error::not_found));
}
