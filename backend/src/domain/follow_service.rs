//! Follow and unfollow use cases.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::ports::{FollowChange, FollowCommand, FollowRepository, PageCache, UserRepository};
use super::repository_errors::{map_follow_error, map_user_error};
use super::{Error, FollowEdge, User, UserId, Username};

/// Follower relationship service implementing [`FollowCommand`].
#[derive(Clone)]
pub struct FollowCommandService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
    cache: Arc<dyn PageCache>,
}

impl FollowCommandService {
    /// Create a service over the given adapters.
    pub fn new(
        users: Arc<dyn UserRepository>,
        follows: Arc<dyn FollowRepository>,
        cache: Arc<dyn PageCache>,
    ) -> Self {
        Self {
            users,
            follows,
            cache,
        }
    }

    async fn author(&self, username: &str) -> Result<User, Error> {
        let not_found = || Error::not_found(format!("user {username} not found"));
        let Ok(name) = Username::new(username) else {
            return Err(not_found());
        };
        self.users
            .find_by_username(&name)
            .await
            .map_err(map_user_error)?
            .ok_or_else(not_found)
    }

    async fn applied(&self, changed: bool) -> FollowChange {
        if !changed {
            return FollowChange::Unchanged;
        }
        if let Err(err) = self.cache.clear().await {
            warn!(error = %err, "failed to clear page cache after follow change");
        }
        FollowChange::Applied
    }
}

#[async_trait]
impl FollowCommand for FollowCommandService {
    async fn follow(&self, follower: &UserId, username: &str) -> Result<FollowChange, Error> {
        let author = self.author(username).await?;
        let Ok(edge) = FollowEdge::new(follower.clone(), author.id().clone()) else {
            return Ok(FollowChange::SelfTarget);
        };
        if self.follows.exists(&edge).await.map_err(map_follow_error)? {
            return Ok(FollowChange::Unchanged);
        }
        let created = self.follows.insert(&edge).await.map_err(map_follow_error)?;
        if created {
            info!(follower = %follower, author = %author.username(), "follow created");
        }
        Ok(self.applied(created).await)
    }

    async fn unfollow(&self, follower: &UserId, username: &str) -> Result<FollowChange, Error> {
        let author = self.author(username).await?;
        let Ok(edge) = FollowEdge::new(follower.clone(), author.id().clone()) else {
            return Ok(FollowChange::SelfTarget);
        };
        let removed = self.follows.delete(&edge).await.map_err(map_follow_error)?;
        if removed {
            info!(follower = %follower, author = %author.username(), "follow removed");
        }
        Ok(self.applied(removed).await)
    }
}
