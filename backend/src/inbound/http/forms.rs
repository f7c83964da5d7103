//! Form and query payloads accepted by the HTML handlers.
//!
//! Fields default to empty strings so a partially submitted form reaches the
//! domain validators instead of failing extraction.

use serde::{Deserialize, Serialize};

/// `?page=` on listing pages. Kept raw; the paginator decides what it means.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

/// Text fields of the create and edit post form, echoed back on errors.
///
/// The body is read by [`super::uploads::PostSubmission`] because the form
/// may carry a file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PostForm {
    pub text: String,
    /// Group id as submitted by the `<select>`; empty means no group.
    pub group: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

/// Login form. The password is never echoed back.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

/// `?next=` on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl SignupForm {
    pub fn as_request(&self) -> crate::domain::SignupRequest<'_> {
        crate::domain::SignupRequest {
            first_name: &self.first_name,
            last_name: &self.last_name,
            username: &self.username,
            email: &self.email,
            password1: &self.password1,
            password2: &self.password2,
        }
    }
}

/// Values echoed back into a re-rendered signup form.
#[derive(Debug, Default, Serialize)]
pub struct SignupEcho<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a SignupForm> for SignupEcho<'a> {
    fn from(form: &'a SignupForm) -> Self {
        Self {
            first_name: &form.first_name,
            last_name: &form.last_name,
            username: &form.username,
            email: &form.email,
        }
    }
}

/// Username echoed back into a re-rendered login form.
#[derive(Debug, Default, Serialize)]
pub struct LoginEcho<'a> {
    pub username: &'a str,
}

/// `next` when it is a path on this site; `/` otherwise.
///
/// Scheme-relative (`//host`) and absolute URLs are rejected so the login
/// form cannot bounce users to another origin. Browsers drop tabs and line
/// breaks from URLs, so any whitespace or control byte is rejected as well.
pub fn safe_next(next: &str) -> &str {
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(|c| c.is_control() || c.is_whitespace());
    if local { next } else { "/" }
}
