//! Port abstraction for post persistence.
//!
//! Listings are always ordered newest first (`pub_date` descending, id
//! descending as a tie-break) and fetched one pagination window at a time.
use async_trait::async_trait;
use pagination::Window;

use crate::domain::{NewPost, Post, PostChanges, PostFilter, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Number of posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<usize, PostPersistenceError>;

    /// One window of posts matching `filter`, newest first.
    async fn list(
        &self,
        filter: &PostFilter,
        window: Window,
    ) -> Result<Vec<Post>, PostPersistenceError>;

    /// Fetch a single post.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Insert a post in a single statement and return it joined.
    async fn insert(&self, post: &NewPost) -> Result<Post, PostPersistenceError>;

    /// Apply an edit; `None` when the post no longer exists.
    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostPersistenceError>;
}
