//! Server-rendered pages and the view models they display.
//!
//! Templates live in `backend/templates` and are compiled by `askama`. View
//! models flatten domain values into display strings so templates stay free
//! of logic beyond loops and conditionals.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use askama::Template;
use pagination::Page;
use tracing::error;

use crate::domain::validation::NON_FIELD_ERRORS;
use crate::domain::{Comment, Error, FieldErrors, Group, Post};
use crate::inbound::http::session::Viewer;

const DATE_FORMAT: &str = "%d %b %Y %H:%M";

/// Group badge shown on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLink {
    pub title: String,
    pub slug: String,
}

/// A post as rendered in listings and on its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: i64,
    pub text: String,
    pub pub_date: String,
    pub author: String,
    pub group: Option<GroupLink>,
    pub image_url: Option<String>,
    pub url: String,
    pub edit_url: String,
    pub comment_url: String,
}

impl PostCard {
    /// Flatten a post; `media_url` must end with a slash.
    pub fn new(post: &Post, media_url: &str) -> Self {
        let author = post.author.username().as_str().to_owned();
        let url = post_url(&author, post.id.get());
        Self {
            id: post.id.get(),
            text: post.text.clone(),
            pub_date: post.pub_date.format(DATE_FORMAT).to_string(),
            group: post.group.as_ref().map(|group| GroupLink {
                title: group.title().to_owned(),
                slug: group.slug().as_str().to_owned(),
            }),
            image_url: post
                .image
                .as_ref()
                .map(|image| format!("{media_url}{}", image.as_str())),
            edit_url: format!("{url}edit"),
            comment_url: format!("{url}comment"),
            url,
            author,
        }
    }

    /// Flatten every post on a page.
    pub fn all(posts: &[Post], media_url: &str) -> Vec<Self> {
        posts.iter().map(|post| Self::new(post, media_url)).collect()
    }
}

/// Canonical detail URL of a post.
pub fn post_url(username: &str, post_id: i64) -> String {
    format!("/{username}/{post_id}/")
}

/// A comment under a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCard {
    pub author: String,
    pub text: String,
    pub created: String,
}

impl From<&Comment> for CommentCard {
    fn from(comment: &Comment) -> Self {
        Self {
            author: comment.author.username().as_str().to_owned(),
            text: comment.text.clone(),
            created: comment.created.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Navigation state for a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub number: usize,
    pub num_pages: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl Pager {
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            number: page.number().get(),
            num_pages: page.num_pages(),
            previous: page.previous_page_number(),
            next: page.next_page_number(),
        }
    }
}

/// A `<select>` option for the post form's group field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOption {
    pub id: i64,
    pub title: String,
    pub selected: bool,
}

impl GroupOption {
    /// Options for every group, marking the one whose id equals `selected`.
    pub fn all(groups: &[Group], selected: &str) -> Vec<Self> {
        groups
            .iter()
            .map(|group| Self {
                id: group.id().get(),
                title: group.title().to_owned(),
                selected: group.id().get().to_string() == selected.trim(),
            })
            .collect()
    }
}

/// Validation messages split by post form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub text: Vec<String>,
    pub group: Vec<String>,
    pub image: Vec<String>,
    pub general: Vec<String>,
}

impl From<&FieldErrors> for FormErrors {
    fn from(errors: &FieldErrors) -> Self {
        Self {
            text: errors.get("text").to_vec(),
            group: errors.get("group").to_vec(),
            image: errors.get("image").to_vec(),
            general: errors.get(NON_FIELD_ERRORS).to_vec(),
        }
    }
}

/// Values echoed back into a post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFormValues {
    pub text: String,
    pub group: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub viewer: Option<String>,
    pub posts: Vec<PostCard>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "group.html")]
pub struct GroupPage {
    pub viewer: Option<String>,
    pub title: String,
    pub description: String,
    pub posts: Vec<PostCard>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfilePage {
    pub viewer: Option<String>,
    pub author: String,
    pub email: String,
    pub post_count: usize,
    pub follower_count: usize,
    pub following_count: usize,
    pub following: bool,
    pub can_follow: bool,
    pub posts: Vec<PostCard>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "posts/post.html")]
pub struct PostPage {
    pub viewer: Option<String>,
    pub post: PostCard,
    pub author_post_count: usize,
    pub can_edit: bool,
    pub comments: Vec<CommentCard>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "posts/new_post.html")]
pub struct PostFormPage {
    pub viewer: Option<String>,
    pub heading: &'static str,
    pub button: &'static str,
    pub action: String,
    pub values: PostFormValues,
    pub groups: Vec<GroupOption>,
    pub errors: FormErrors,
    pub image_url: Option<String>,
}

#[derive(Template)]
#[template(path = "posts/comments.html")]
pub struct CommentFormPage {
    pub viewer: Option<String>,
    pub post: PostCard,
    pub text: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "posts/follow.html")]
pub struct FollowPage {
    pub viewer: Option<String>,
    pub posts: Vec<PostCard>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "registration/login.html")]
pub struct LoginPage {
    pub viewer: Option<String>,
    pub username: String,
    pub next: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "misc/404.html")]
pub struct NotFoundPage {
    pub viewer: Option<String>,
    pub path: String,
}

#[derive(Template)]
#[template(path = "misc/500.html")]
pub struct ServerErrorPage {
    pub viewer: Option<String>,
}

/// Name shown in the navigation bar for the signed-in user.
pub fn viewer_name(viewer: Option<&Viewer>) -> Option<String> {
    viewer.map(|viewer| viewer.username.as_str().to_owned())
}

/// Render a template to a string.
pub fn render(template: &impl Template) -> Result<String, Error> {
    template.render().map_err(|err| {
        error!(error = %err, "template rendering failed");
        Error::internal(format!("template rendering failed: {err}"))
    })
}

/// `200 OK` HTML response with `body`.
pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Render a template into a `200 OK` HTML response.
pub fn render_html(template: &impl Template) -> Result<HttpResponse, Error> {
    render(template).map(html)
}
