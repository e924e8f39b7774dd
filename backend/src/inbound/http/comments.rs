//! Comment submission.
//!
//! The comment form on the post page posts to `/{username}/{id}/comment`;
//! a POST to the post page itself is treated the same way.

use actix_web::{HttpRequest, HttpResponse, post, route, web};
use pagination::PageNumber;
use tracing::info;

use crate::domain::ports::PostLocator;
use crate::domain::{PostId, Submission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{login_redirect, redirect};
use crate::inbound::http::forms::{read_form, validate_comment};
use crate::inbound::http::pages::{CommentFormPage, PostCard, post_url, render_html};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

async fn submit_comment(
    state: &HttpState,
    session: &SessionContext,
    req: &HttpRequest,
    path: (String, i64),
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req));
    };
    let (username, post_id) = path;
    let locator = PostLocator::new(username, PostId::new(post_id));
    let form = read_form(req, payload).await?;
    let (text, outcome) = validate_comment(&form);

    match state.posts.add_comment(&viewer.id, &locator, outcome).await? {
        Submission::Accepted(comment) => {
            info!(comment_id = comment.id.get(), post_id, "comment added");
            Ok(redirect(&post_url(&locator.username, post_id)))
        }
        Submission::Rejected(errors) => {
            let detail = state
                .feed
                .post_detail(&locator.username, locator.post_id, PageNumber::FIRST)
                .await?;
            render_html(&CommentFormPage {
                viewer: Some(viewer.username.to_string()),
                post: PostCard::new(&detail.post, state.media_url()),
                text,
                errors: errors.get("text").to_vec(),
            })
        }
    }
}

#[route("/{username}/{post_id}/comment", method = "GET", method = "POST")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<(String, i64)>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    submit_comment(&state, &session, &req, path.into_inner(), payload).await
}

#[post("/{username}/{post_id}/")]
pub async fn comment_on_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<(String, i64)>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    submit_comment(&state, &session, &req, path.into_inner(), payload).await
}
