//! Password login backed by the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{LoginService, UserRepository};
use super::repository_errors::map_user_error;
use super::{Error, LoginCredentials, User, Username};

/// Authenticates stored bcrypt password hashes.
#[derive(Clone)]
pub struct PasswordLoginService {
    users: Arc<dyn UserRepository>,
}

impl PasswordLoginService {
    /// Create a service over the user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl LoginService for PasswordLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(invalid_credentials());
        };
        let Some(stored) = self
            .users
            .find_credentials(&username)
            .await
            .map_err(map_user_error)?
        else {
            debug!(username = %username, "login for unknown user");
            return Err(invalid_credentials());
        };
        let matches = stored
            .password_hash
            .verify(credentials.password())
            .map_err(|err| Error::internal(format!("password verification failed: {err}")))?;
        if matches {
            Ok(stored.user)
        } else {
            debug!(username = %username, "login with wrong password");
            Err(invalid_credentials())
        }
    }
}
