//! Operator use cases for provisioning accounts and communities.
//!
//! The web surface never creates users or groups; the `yatube-admin` binary
//! drives this service instead.

use std::sync::Arc;

use tracing::info;

use super::ports::{GroupRepository, UserRepository};
use super::repository_errors::{map_group_error, map_user_error};
use super::{Error, Group, GroupSlug, NewGroup, NewUser, PasswordHash, User, Username};

/// bcrypt work factor for newly created accounts.
pub const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Provisioning service used by the operator CLI.
#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    hash_cost: u32,
}

impl AdminService {
    /// Create a service over the given repositories.
    pub fn new(users: Arc<dyn UserRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self {
            users,
            groups,
            hash_cost: PASSWORD_HASH_COST,
        }
    }

    /// Override the bcrypt cost; tests use the minimum to stay fast.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Create an account with a hashed password.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, Error> {
        let username = Username::new(username)
            .map_err(|err| Error::invalid_request(format!("invalid username: {err}")))?;
        if password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        let hash = PasswordHash::hash(password, self.hash_cost)
            .map_err(|err| Error::internal(err.to_string()))?;
        let new_user = NewUser {
            username,
            email: email.trim().to_owned(),
            password_hash: hash.as_str().to_owned(),
        };
        let user = self.users.insert(&new_user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), username = %user.username(), "user created");
        Ok(user)
    }

    /// Create a community.
    pub async fn create_group(
        &self,
        title: &str,
        slug: &str,
        description: &str,
    ) -> Result<Group, Error> {
        let slug = GroupSlug::new(slug)
            .map_err(|err| Error::invalid_request(format!("invalid slug: {err}")))?;
        let new_group = NewGroup::new(title.trim(), slug, description)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let group = self
            .groups
            .insert(&new_group)
            .await
            .map_err(map_group_error)?;
        info!(group_id = %group.id(), slug = %group.slug(), "group created");
        Ok(group)
    }
}
