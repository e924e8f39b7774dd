//! Blog posts and the values used to create and edit them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Group, GroupId, ImagePath, ImageUpload, User, UserId, Username};

/// Database identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Required free-text body shared by posts and comments.
///
/// Surrounding whitespace is stripped; a body that is blank after stripping
/// is rejected.
///
/// # Examples
/// ```
/// use yatube::domain::BodyText;
///
/// assert_eq!(BodyText::new("  hi  ").map(String::from), Some("hi".to_owned()));
/// assert!(BodyText::new(" \n ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyText(String);

impl BodyText {
    /// Strip and validate raw input; `None` when blank.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BodyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BodyText> for String {
    fn from(value: BodyText) -> Self {
        value.0
    }
}

/// A published post joined with its author and optional group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Database identifier.
    pub id: PostId,
    /// Post body.
    pub text: String,
    /// Publication timestamp, set on creation.
    pub pub_date: DateTime<Utc>,
    /// Author account.
    pub author: User,
    /// Community the post is filed under.
    pub group: Option<Group>,
    /// Stored image, if one was uploaded.
    pub image: Option<ImagePath>,
}

impl Post {
    /// Whether `user` wrote this post.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.author.id() == user
    }

    /// Whether the post sits under `username`'s profile.
    pub fn belongs_to(&self, username: &Username) -> bool {
        self.author.username() == username
    }
}

/// Validated post form contents, before the image is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    /// Post body.
    pub text: BodyText,
    /// Selected group; existence is checked by the write service.
    pub group: Option<GroupId>,
    /// Newly uploaded image; `None` keeps the current image on edit.
    pub image: Option<ImageUpload>,
}

/// Insert payload for a new post. Everything is written in one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: UserId,
    pub text: BodyText,
    pub group: Option<GroupId>,
    pub image: Option<ImagePath>,
}

/// Update payload for an edited post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    /// Editing user; always the post's author.
    pub author: UserId,
    pub text: BodyText,
    /// New group, or `None` to clear it.
    pub group: Option<GroupId>,
    /// Replacement image, or `None` to keep the stored one.
    pub image: Option<ImagePath>,
}

/// Which posts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts filed under a group.
    Group(GroupId),
    /// Posts written by a user.
    Author(UserId),
    /// Posts written by anyone the user follows.
    FollowedBy(UserId),
}
