//! Communities that posts may optionally belong to.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::slug::is_valid_slug;

/// Maximum length of a group title.
pub const GROUP_TITLE_MAX: usize = 200;
/// Maximum length of a group slug.
pub const GROUP_SLUG_MAX: usize = 50;

/// Validation errors for group values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    #[error("group title must not be empty")]
    EmptyTitle,
    #[error("group title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("group slug may only contain letters, digits, hyphens and underscores")]
    InvalidSlug,
    #[error("group slug must be at most {max} characters")]
    SlugTooLong { max: usize },
}

/// Database identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(i64);

impl GroupId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL-safe unique group identifier used in `/group/{slug}/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupSlug(String);

impl GroupSlug {
    /// Validate and construct a slug.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::GroupSlug;
    ///
    /// assert!(GroupSlug::new("cats").is_ok());
    /// assert!(GroupSlug::new("no spaces").is_err());
    /// ```
    pub fn new(slug: impl Into<String>) -> Result<Self, GroupValidationError> {
        let slug = slug.into();
        if !is_valid_slug(&slug) {
            return Err(GroupValidationError::InvalidSlug);
        }
        if slug.len() > GROUP_SLUG_MAX {
            return Err(GroupValidationError::SlugTooLong {
                max: GROUP_SLUG_MAX,
            });
        }
        Ok(Self(slug))
    }

    /// Borrow the slug.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GroupSlug> for String {
    fn from(value: GroupSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupSlug {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    id: GroupId,
    title: String,
    slug: GroupSlug,
    description: String,
}

impl Group {
    /// Build a group from stored values.
    pub fn new(
        id: GroupId,
        title: impl Into<String>,
        slug: GroupSlug,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            slug,
            description: description.into(),
        }
    }

    /// Database identifier.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// URL slug.
    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

/// Validated group creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    title: String,
    slug: GroupSlug,
    description: String,
}

impl NewGroup {
    /// Validate the title and assemble a creation payload.
    pub fn new(
        title: impl Into<String>,
        slug: GroupSlug,
        description: impl Into<String>,
    ) -> Result<Self, GroupValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GroupValidationError::EmptyTitle);
        }
        if title.chars().count() > GROUP_TITLE_MAX {
            return Err(GroupValidationError::TitleTooLong {
                max: GROUP_TITLE_MAX,
            });
        }
        Ok(Self {
            title,
            slug,
            description: description.into(),
        })
    }

    /// Display title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// URL slug.
    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}
