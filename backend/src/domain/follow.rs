//! Directed follower relationships between users.

use serde::Serialize;

use super::UserId;

/// Errors raised when building a follow relationship.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FollowValidationError {
    #[error("users cannot follow themselves")]
    SelfFollow,
}

/// A follower/author pair. Construction rejects self-follows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    follower: UserId,
    author: UserId,
}

impl FollowEdge {
    /// Validate and build a relationship.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::{FollowEdge, UserId};
    ///
    /// let me = UserId::random();
    /// assert!(FollowEdge::new(me.clone(), UserId::random()).is_ok());
    /// assert!(FollowEdge::new(me.clone(), me).is_err());
    /// ```
    pub fn new(follower: UserId, author: UserId) -> Result<Self, FollowValidationError> {
        if follower == author {
            return Err(FollowValidationError::SelfFollow);
        }
        Ok(Self { follower, author })
    }

    /// User doing the following.
    pub fn follower(&self) -> &UserId {
        &self.follower
    }

    /// User being followed.
    pub fn author(&self) -> &UserId {
        &self.author
    }
}

/// Follower statistics shown on a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowCounts {
    /// Users following the profile.
    pub followers: usize,
    /// Users the profile follows.
    pub following: usize,
}
