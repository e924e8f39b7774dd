//! Port abstraction for follower relationships.
//!
//! Storage enforces one row per follower/author pair, so inserting an
//! existing pair is reported as "unchanged" rather than an error.
use async_trait::async_trait;

use crate::domain::{FollowCounts, FollowEdge, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Whether the relationship exists.
    async fn exists(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError>;

    /// Create the relationship; `false` when it already existed.
    async fn insert(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError>;

    /// Remove the relationship; `false` when there was nothing to remove.
    async fn delete(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError>;

    /// Follower and following totals for a user.
    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowPersistenceError>;
}
