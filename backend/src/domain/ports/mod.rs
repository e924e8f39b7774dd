//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, media storage, page cache) expose typed
//! errors built with `define_port_error!`; driving ports (queries and
//! commands) return the domain [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod feed_query;
mod follow_command;
mod follow_repository;
mod group_repository;
mod login_service;
mod media_store;
mod page_cache;
mod post_command;
mod post_repository;
mod user_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::{FeedQuery, GroupFeed, PostDetail, ProfileView};
#[cfg(test)]
pub use follow_command::MockFollowCommand;
pub use follow_command::{FollowChange, FollowCommand};
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowPersistenceError, FollowRepository};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{GroupPersistenceError, GroupRepository};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaStore, MediaStoreError};
#[cfg(test)]
pub use page_cache::MockPageCache;
pub use page_cache::{
    CacheGeneration, NoOpPageCache, PageCache, PageCacheError, PageCacheKey,
    PageCacheKeyValidationError,
};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::{EditAccess, EditOutcome, PostCommand, PostLocator, Validated};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentials, UserPersistenceError, UserRepository};
