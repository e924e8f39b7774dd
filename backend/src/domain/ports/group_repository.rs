//! Port abstraction for community persistence.
use async_trait::async_trait;

use crate::domain::{Group, GroupId, GroupSlug, NewGroup};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by group repository adapters.
    pub enum GroupPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "group repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "group repository query failed: {message}",
        /// The slug is already taken.
        Conflict { message: String } => "group already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Fetch a group by URL slug.
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupPersistenceError>;

    /// Fetch a group by identifier.
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupPersistenceError>;

    /// All groups ordered by title, for the post form's choice list.
    async fn list_all(&self) -> Result<Vec<Group>, GroupPersistenceError>;

    /// Create a group.
    async fn insert(&self, group: &NewGroup) -> Result<Group, GroupPersistenceError>;
}
