//! Static "about" pages.

use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{base_context, current_viewer};

async fn static_page(
    state: &HttpState,
    session: &SessionContext,
    template: &str,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(state, session).await?;
    state
        .templates
        .page(template, &base_context(viewer.as_ref()))
}

#[get("/about/author/")]
pub async fn author(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    static_page(&state, &session, "about/author.html").await
}

#[get("/about/tech/")]
pub async fn tech(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    static_page(&state, &session, "about/tech.html").await
}
