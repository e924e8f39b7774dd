//! Driving port for post and comment writes.
//!
//! Form parsing happens in the inbound adapter; the adapter passes either a
//! validated draft or the field errors it collected. The service resolves
//! lookups first (so missing posts are `NotFound` and foreign posts are
//! reported as such even for invalid submissions) and only then looks at the
//! form outcome.

use async_trait::async_trait;

use crate::domain::{
    BodyText, Comment, Error, FieldErrors, Post, PostDraft, PostId, Submission, UserId,
};

/// Form outcome handed to write use cases.
pub type Validated<T> = Result<T, FieldErrors>;

/// Whether a user may edit a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAccess {
    /// The user wrote the post.
    Owner(Post),
    /// Someone else wrote the post.
    NotAuthor(Post),
}

/// Result of an edit submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The post was updated.
    Updated(Post),
    /// The submission failed validation; the post is unchanged.
    Rejected { post: Post, errors: FieldErrors },
    /// The editor is not the author; the post is unchanged.
    NotAuthor(Post),
}

/// Identifies a post by its author's username and its id, as URLs do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLocator {
    pub username: String,
    pub post_id: PostId,
}

impl PostLocator {
    /// Build a locator from URL segments.
    pub fn new(username: impl Into<String>, post_id: PostId) -> Self {
        Self {
            username: username.into(),
            post_id,
        }
    }
}

/// Domain use-case port for post and comment writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post authored by `author`.
    async fn create_post(
        &self,
        author: &UserId,
        draft: Validated<PostDraft>,
    ) -> Result<Submission<Post>, Error>;

    /// Load a post for editing and report whether `editor` owns it.
    async fn edit_access(
        &self,
        editor: &UserId,
        target: &PostLocator,
    ) -> Result<EditAccess, Error>;

    /// Apply an edit submitted by `editor`.
    async fn edit_post(
        &self,
        editor: &UserId,
        target: &PostLocator,
        draft: Validated<PostDraft>,
    ) -> Result<EditOutcome, Error>;

    /// Comment on a post as `author`.
    async fn add_comment(
        &self,
        author: &UserId,
        target: &PostLocator,
        text: Validated<BodyText>,
    ) -> Result<Submission<Comment>, Error>;
}
