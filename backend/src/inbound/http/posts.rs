//! Listing pages and the post create/edit forms.
//!
//! ```text
//! GET      /                      latest posts
//! GET      /group/{slug}/         a group's posts
//! GET      /{username}/           profile
//! GET      /{username}/{id}/      post detail with comments
//! GET|POST /new                   new post
//! GET|POST /{username}/{id}/edit  edit post (author only)
//! GET      /follow/               posts by followed authors
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use pagination::PageNumber;
use serde::Deserialize;
use tracing::info;

use crate::domain::ports::{EditAccess, EditOutcome, PostLocator};
use crate::domain::{FieldErrors, Post, PostId, Submission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{login_redirect, redirect};
use crate::inbound::http::forms::{read_form, validate_post};
use crate::inbound::http::page_cache::cached;
use crate::inbound::http::pages::{
    CommentCard, FollowPage, FormErrors, GroupOption, GroupPage, IndexPage, Pager, PostCard,
    PostFormPage, PostFormValues, PostPage, ProfilePage, html, post_url, render, render_html,
    viewer_name,
};
use crate::inbound::http::session::{SessionContext, Viewer};
use crate::inbound::http::state::HttpState;

/// `?page=` query shared by every paginated listing.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page; garbage falls back to the first page.
    pub fn number(&self) -> PageNumber {
        PageNumber::parse_lenient(self.page.as_deref())
    }
}

#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer()?;
    let number = query.number();
    let body = cached(&state, &req, viewer.as_ref(), || async {
        let posts = state.feed.index(number).await?;
        render(&IndexPage {
            viewer: viewer_name(viewer.as_ref()),
            posts: PostCard::all(posts.items(), state.media_url()),
            pager: Pager::of(&posts),
        })
    })
    .await?;
    Ok(html(body))
}

#[get("/group/{slug}/")]
pub async fn group_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer()?;
    let feed = state.feed.group_feed(&path, query.number()).await?;
    render_html(&GroupPage {
        viewer: viewer_name(viewer.as_ref()),
        title: feed.group.title().to_owned(),
        description: feed.group.description().to_owned(),
        posts: PostCard::all(feed.posts.items(), state.media_url()),
        pager: Pager::of(&feed.posts),
    })
}

#[get("/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer()?;
    let number = query.number();
    let body = cached(&state, &req, viewer.as_ref(), || async {
        let view = state
            .feed
            .profile(&path, viewer.as_ref().map(|v| v.id.clone()), number)
            .await?;
        let can_follow = viewer
            .as_ref()
            .is_some_and(|v| &v.username != view.author.username());
        render(&ProfilePage {
            viewer: viewer_name(viewer.as_ref()),
            author: view.author.username().to_string(),
            email: view.author.email().to_owned(),
            post_count: view.post_count,
            follower_count: view.follow_counts.followers,
            following_count: view.follow_counts.following,
            following: view.following.unwrap_or(false),
            can_follow,
            posts: PostCard::all(view.posts.items(), state.media_url()),
            pager: Pager::of(&view.posts),
        })
    })
    .await?;
    Ok(html(body))
}

#[get("/{username}/{post_id}/")]
pub async fn post_view(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<(String, i64)>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer()?;
    let (username, post_id) = path.into_inner();
    let number = query.number();
    let body = cached(&state, &req, viewer.as_ref(), || async {
        let detail = state
            .feed
            .post_detail(&username, PostId::new(post_id), number)
            .await?;
        let can_edit = viewer
            .as_ref()
            .is_some_and(|v| detail.post.is_authored_by(&v.id));
        render(&PostPage {
            viewer: viewer_name(viewer.as_ref()),
            post: PostCard::new(&detail.post, state.media_url()),
            author_post_count: detail.author_post_count,
            can_edit,
            comments: detail.comments.items().iter().map(CommentCard::from).collect(),
            pager: Pager::of(&detail.comments),
        })
    })
    .await?;
    Ok(html(body))
}

/// Which post form is being shown.
enum FormMode<'a> {
    Create,
    Edit(&'a Post),
}

struct FormView<'a> {
    viewer: &'a Viewer,
    mode: FormMode<'a>,
    values: PostFormValues,
    errors: FieldErrors,
}

async fn render_post_form(state: &HttpState, view: FormView<'_>) -> ApiResult<HttpResponse> {
    let groups = state.feed.groups().await?;
    let (heading, button, action, image_url) = match view.mode {
        FormMode::Create => ("New post", "Publish", "/new".to_owned(), None),
        FormMode::Edit(post) => {
            let card = PostCard::new(post, state.media_url());
            ("Edit post", "Save", card.edit_url, card.image_url)
        }
    };
    render_html(&PostFormPage {
        viewer: Some(view.viewer.username.to_string()),
        heading,
        button,
        action,
        groups: GroupOption::all(&groups, &view.values.group),
        values: view.values,
        errors: FormErrors::from(&view.errors),
        image_url,
    })
}

fn bound_values(post: &Post) -> PostFormValues {
    PostFormValues {
        text: post.text.clone(),
        group: post
            .group
            .as_ref()
            .map(|group| group.id().get().to_string())
            .unwrap_or_default(),
    }
}

fn detail_redirect(post: &Post) -> HttpResponse {
    redirect(&post_url(post.author.username().as_str(), post.id.get()))
}

#[get("/new")]
pub async fn new_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(&req));
    };
    render_post_form(
        &state,
        FormView {
            viewer: &viewer,
            mode: FormMode::Create,
            values: PostFormValues::default(),
            errors: FieldErrors::new(),
        },
    )
    .await
}

/// Publish a post and go back to the front page.
#[post("/new")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(&req));
    };
    let form = read_form(&req, payload).await?;
    let (values, draft) = validate_post(&form);
    match state.posts.create_post(&viewer.id, draft).await? {
        Submission::Accepted(post) => {
            info!(post_id = post.id.get(), author = %viewer.username, "post published");
            Ok(redirect("/"))
        }
        Submission::Rejected(errors) => {
            render_post_form(
                &state,
                FormView {
                    viewer: &viewer,
                    mode: FormMode::Create,
                    values,
                    errors,
                },
            )
            .await
        }
    }
}

#[get("/{username}/{post_id}/edit")]
pub async fn edit_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<(String, i64)>,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(&req));
    };
    let (username, post_id) = path.into_inner();
    let locator = PostLocator::new(username, PostId::new(post_id));
    match state.posts.edit_access(&viewer.id, &locator).await? {
        EditAccess::NotAuthor(post) => Ok(detail_redirect(&post)),
        EditAccess::Owner(post) => {
            render_post_form(
                &state,
                FormView {
                    viewer: &viewer,
                    values: bound_values(&post),
                    mode: FormMode::Edit(&post),
                    errors: FieldErrors::new(),
                },
            )
            .await
        }
    }
}

/// Apply an edit. Anyone but the author is sent back to the post untouched.
#[post("/{username}/{post_id}/edit")]
pub async fn edit_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<(String, i64)>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(&req));
    };
    let (username, post_id) = path.into_inner();
    let locator = PostLocator::new(username, PostId::new(post_id));
    let form = read_form(&req, payload).await?;
    let (values, draft) = validate_post(&form);
    match state.posts.edit_post(&viewer.id, &locator, draft).await? {
        EditOutcome::Updated(post) => {
            info!(post_id = post.id.get(), "post edited");
            Ok(detail_redirect(&post))
        }
        EditOutcome::NotAuthor(post) => Ok(detail_redirect(&post)),
        EditOutcome::Rejected { post, errors } => {
            render_post_form(
                &state,
                FormView {
                    viewer: &viewer,
                    mode: FormMode::Edit(&post),
                    values,
                    errors,
                },
            )
            .await
        }
    }
}

#[get("/follow/")]
pub async fn follow_index(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(&req));
    };
    let posts = state.feed.follow_feed(&viewer.id, query.number()).await?;
    render_html(&FollowPage {
        viewer: Some(viewer.username.to_string()),
        posts: PostCard::all(posts.items(), state.media_url()),
        pager: Pager::of(&posts),
    })
}

#[cfg(test)]
mod tests;
