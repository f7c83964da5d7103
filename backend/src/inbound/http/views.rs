//! Template view models and shared page-building helpers.
//!
//! Domain entities keep their fields private; these structs flatten them into
//! the shapes the templates read.

use std::collections::BTreeMap;

use pagination::{Page, PageLinks};
use serde::Serialize;
use tera::Context;

use crate::domain::{Comment, Error, FieldErrors, Group, NON_FIELD, Post, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};

const DATE_FORMAT: &str = "%d %B %Y";

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub display_name: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            display_name: user.display_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<&Group> for GroupView {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id().get(),
            title: group.title().to_owned(),
            slug: group.slug().to_string(),
            description: group.description().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: i32,
    pub text: String,
    /// Longer prefix used as the detail page title.
    pub title: String,
    /// Short prefix used in admin-style listings.
    pub label: String,
    pub author: UserView,
    pub group: Option<GroupView>,
    pub image: Option<String>,
    pub created: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id().get(),
            text: post.text().as_ref().to_owned(),
            title: post.title().to_owned(),
            label: post.label().to_owned(),
            author: post.author().into(),
            group: post.group().map(GroupView::from),
            image: post.image().map(str::to_owned),
            created: post.created_at().format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub author: UserView,
    pub text: String,
    pub created: String,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id().get(),
            author: comment.author().into(),
            text: comment.text().to_owned(),
            created: comment.created_at().format(DATE_FORMAT).to_string(),
        }
    }
}

/// One `<option>` of the post form's group select.
#[derive(Debug, Clone, Serialize)]
pub struct GroupChoice {
    pub id: i32,
    pub title: String,
    pub selected: bool,
}

/// Build the select options, marking the submitted value.
pub fn group_choices(groups: &[Group], submitted: &str) -> Vec<GroupChoice> {
    let submitted = submitted.trim();
    groups
        .iter()
        .map(|group| GroupChoice {
            id: group.id().get(),
            title: group.title().to_owned(),
            selected: group.id().to_string() == submitted,
        })
        .collect()
}

/// Messages for every field in `fields` plus the non-field slot.
///
/// Templates index the map directly, so every key must be present even
/// when it has no messages.
pub fn form_errors<'a>(
    fields: &[&'a str],
    errors: &FieldErrors,
) -> BTreeMap<&'a str, Vec<String>> {
    fields
        .iter()
        .copied()
        .chain(std::iter::once(NON_FIELD))
        .map(|field| (field, errors.get(field).to_vec()))
        .collect()
}

/// Path and query of the current request, as used for `next` and cache keys.
pub fn request_target(req: &HttpRequest) -> &str {
    req.uri().path_and_query().map_or("/", |target| target.as_str())
}

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn profile_url(user: &User) -> String {
    format!("/profile/{}/", user.username())
}

pub fn post_url(id: crate::domain::PostId) -> String {
    format!("/posts/{id}/")
}

/// Base context carrying the signed-in user, or `null` for guests.
pub fn base_context(viewer: Option<&User>) -> Context {
    let mut context = Context::new();
    context.insert("viewer", &viewer.map(UserView::from));
    context
}

/// Insert `page` and its navigation links into `context`.
pub fn insert_page(
    context: &mut Context,
    req: &HttpRequest,
    page: Page<Post>,
) -> Result<(), Error> {
    let links = PageLinks::from_request_target(request_target(req))
        .map_err(|err| Error::internal(format!("failed to build page links: {err}")))?;
    context.insert("nav", &links.navigation(&page));
    context.insert("page", &page.map(|post| PostView::from(&post)));
    Ok(())
}

/// The signed-in user, if any.
///
/// A session naming a deleted account reads as anonymous.
pub async fn current_viewer(
    state: &HttpState,
    session: &SessionContext,
) -> Result<Option<User>, Error> {
    match session.user_id()? {
        Some(id) => state.users.find_user(&id).await,
        None => Ok(None),
    }
}

/// The signed-in user, or a redirect to the login form returning to
/// `return_to`.
pub async fn require_viewer(
    state: &HttpState,
    session: &SessionContext,
    return_to: &str,
) -> Result<User, Error> {
    let id = session.require_login(return_to)?;
    state
        .users
        .find_user(&id)
        .await?
        .ok_or_else(|| Error::login_required(return_to))
}
