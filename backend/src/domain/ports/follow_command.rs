//! Driving port for following and unfollowing authors.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// What a follow or unfollow request changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowChange {
    /// A relationship was created or removed.
    Applied,
    /// The relationship already existed (or did not exist, for unfollow).
    Unchanged,
    /// The user targeted their own account.
    SelfTarget,
}

/// Domain use-case port for follower relationships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Follow the author named `username`; `NotFound` for unknown names.
    async fn follow(&self, follower: &UserId, username: &str) -> Result<FollowChange, Error>;

    /// Stop following the author named `username`; `NotFound` for unknown
    /// names.
    async fn unfollow(&self, follower: &UserId, username: &str) -> Result<FollowChange, Error>;
}
