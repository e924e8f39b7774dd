//! Login credentials and stored password hashes.
//!
//! Handlers build [`LoginCredentials`] from submitted form fields before they
//! talk to the login service; the service compares them against a
//! [`PasswordHash`] loaded from the user repository.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when login form values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use yatube::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" leo ", "s3cret").expect("valid credentials");
/// assert_eq!(creds.username(), "leo");
/// assert_eq!(creds.password(), "s3cret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the account lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hashing backend rejected the input or the stored hash.
    #[error("password hashing failed: {message}")]
    Backend { message: String },
}

/// bcrypt hash of a user's password, as stored in the `users` table.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plain-text password with the given bcrypt cost.
    pub fn hash(password: &str, cost: u32) -> Result<Self, PasswordHashError> {
        let plain = Zeroizing::new(password.to_owned());
        bcrypt::hash(plain.as_str(), cost)
            .map(Self)
            .map_err(|err| PasswordHashError::Backend {
                message: err.to_string(),
            })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Check a candidate password against this hash.
    pub fn verify(&self, password: &str) -> Result<bool, PasswordHashError> {
        bcrypt::verify(password, &self.0).map_err(|err| PasswordHashError::Backend {
            message: err.to_string(),
        })
    }

    /// Encoded hash for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn hashes_verify_only_the_original_password() {
        let hash = PasswordHash::hash("correct horse", 4).expect("hash password");
        assert!(hash.verify("correct horse").expect("verify"));
        assert!(!hash.verify("wrong horse").expect("verify"));
    }

    #[rstest]
    fn malformed_stored_hashes_are_errors() {
        let hash = PasswordHash::from_stored("not-a-bcrypt-hash");
        assert!(hash.verify("anything").is_err());
    }

    #[rstest]
    fn debug_output_hides_the_hash() {
        let hash = PasswordHash::from_stored("$2b$04$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
