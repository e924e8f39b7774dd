//! Port abstraction for comment persistence.
use async_trait::async_trait;
use pagination::Window;

use crate::domain::{Comment, NewComment, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Number of comments on a post.
    async fn count_for_post(&self, post: PostId) -> Result<usize, CommentPersistenceError>;

    /// One window of a post's comments, newest first.
    async fn list_for_post(
        &self,
        post: PostId,
        window: Window,
    ) -> Result<Vec<Comment>, CommentPersistenceError>;

    /// Store a comment and return it joined with its author.
    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError>;
}
