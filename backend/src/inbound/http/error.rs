//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while Actix handlers turn
//! failures into HTML error pages, or into a redirect to the login form when
//! a page requires a signed-in user.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Path of the login form.
pub const LOGIN_URL: &str = "/auth/login/";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Bytes left literal in the `next` parameter: unreserved characters and `/`.
const NEXT_KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// `/auth/login/?next=<target>`, percent-encoding everything but unreserved
/// characters and `/`. Spaces become `%20`, never `+`.
pub fn login_redirect_url(next: &str) -> String {
    format!("{LOGIN_URL}?next={}", utf8_percent_encode(next, NEXT_KEEP))
}

fn page_title(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "Page not found",
        StatusCode::FORBIDDEN => "Access denied",
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::SERVICE_UNAVAILABLE => "Service unavailable",
        _ => "Something went wrong",
    }
}

fn error_page(status: StatusCode, message: &str, trace_id: Option<&str>) -> String {
    let title = page_title(status);
    let trace = trace_id
        .map(|id| format!("<p class=\"trace\">Reference: {}</p>", tera::escape_html(id)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <title>{title}</title></head>\n<body data-page=\"error\">\n\
         <h1>{code} {title}</h1>\n<p>{message}</p>\n{trace}\n\
         <p><a href=\"/\">Back to the front page</a></p>\n</body>\n</html>\n",
        code = status.as_u16(),
        message = tera::escape_html(message),
    )
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        if self.login_redirect_target().is_some() {
            return StatusCode::FOUND;
        }
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        if let Some(next) = self.login_redirect_target() {
            return builder
                .insert_header((header::LOCATION, login_redirect_url(next)))
                .finish();
        }

        let message = match self.code() {
            ErrorCode::InternalError => {
                error!(message = self.message(), "request failed");
                "Internal server error"
            }
            ErrorCode::ServiceUnavailable => {
                warn!(message = self.message(), "backing service unavailable");
                "Please try again shortly."
            }
            _ => self.message(),
        };
        builder
            .content_type(ContentType::html())
            .body(error_page(status, message, self.trace_id()))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Fallback service for unmatched routes.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("The requested page does not exist."))
}
