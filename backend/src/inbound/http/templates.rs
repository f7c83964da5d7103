//! Compiled Tera templates for the HTML pages.
//!
//! Templates are embedded at build time so the binary does not depend on the
//! working directory it is started from.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use tera::{Context, Tera};
use tracing::error;

use crate::domain::Error;

macro_rules! embedded {
    ($($name:literal),+ $(,)?) => {
        [$(($name, include_str!(concat!("../../../templates/", $name)))),+]
    };
}

const TEMPLATES: [(&str, &str); 15] = embedded!(
    "base.html",
    "includes/header.html",
    "includes/macros.html",
    "includes/paginator.html",
    "posts/index.html",
    "posts/follow.html",
    "posts/group_list.html",
    "posts/profile.html",
    "posts/post_detail.html",
    "posts/create_post.html",
    "users/login.html",
    "users/signup.html",
    "users/logged_out.html",
    "about/author.html",
    "about/tech.html",
);

/// Renders named page templates.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile every embedded template.
    ///
    /// # Errors
    /// Returns the Tera error when a template fails to parse or extends a
    /// template that does not exist.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    /// Render `name` with `context`.
    pub fn render(&self, name: &str, context: &Context) -> Result<String, Error> {
        self.tera.render(name, context).map_err(|err| {
            error!(template = name, error = ?err, "template rendering failed");
            Error::internal(format!("failed to render {name}"))
        })
    }

    /// Render `name` into a `200 OK` HTML response.
    pub fn page(&self, name: &str, context: &Context) -> Result<HttpResponse, Error> {
        let body = self.render(name, context)?;
        Ok(html(body))
    }
}

/// Wrap a rendered body in a `200 OK` HTML response.
pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
