//! Following and unfollowing authors.
//!
//! Both actions land on the personalised feed whatever they changed.

use actix_web::{HttpRequest, HttpResponse, route, web};
use tracing::info;

use crate::domain::ports::FollowChange;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{login_redirect, redirect};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Personalised feed every follow action redirects to.
pub const FOLLOW_FEED_PATH: &str = "/follow/";

#[route("/{username}/follow", method = "GET", method = "POST")]
pub async fn profile_follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(&req));
    };
    let change = state.follows.follow(&viewer.id, &path).await?;
    if change == FollowChange::Applied {
        info!(follower = %viewer.username, author = %path, "followed author");
    }
    Ok(redirect(FOLLOW_FEED_PATH))
}

#[route("/{username}/unfollow", method = "GET", method = "POST")]
pub async fn profile_unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(&req));
    };
    let change = state.follows.unfollow(&viewer.id, &path).await?;
    if change == FollowChange::Applied {
        info!(follower = %viewer.username, author = %path, "unfollowed author");
    }
    Ok(redirect(FOLLOW_FEED_PATH))
}
