//! Follow and unfollow links on author profiles.

use actix_web::{HttpRequest, HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{profile_url, redirect, request_target, require_viewer};

#[get("/profile/{username}/follow/")]
pub async fn profile_follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = require_viewer(&state, &session, request_target(&req)).await?;
    let author = state.follows.follow(viewer.id(), &username).await?;
    Ok(redirect(&profile_url(&author)))
}

#[get("/profile/{username}/unfollow/")]
pub async fn profile_unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = require_viewer(&state, &session, request_target(&req)).await?;
    let author = state.follows.unfollow(viewer.id(), &username).await?;
    Ok(redirect(&profile_url(&author)))
}
