//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain read models live
//! here so every repository maps rows the same way.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentId, Group, GroupId, GroupSlug, ImagePath, Post, PostId, User, UserId,
    Username,
};

use super::schema::{comments, follows, groups, posts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Row struct for password checks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the groups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Insertable struct for creating group records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = groups)]
pub(crate) struct NewGroupRow<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    #[expect(dead_code, reason = "author is loaded through the users join")]
    pub author_id: Uuid,
    #[expect(dead_code, reason = "group is loaded through the groups join")]
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// Insertable struct for creating post records in one statement.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub text: &'a str,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
    pub image: Option<&'a str>,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    #[expect(dead_code, reason = "author is loaded through the users join")]
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Insertable struct for creating comment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i64,
    pub author_id: Uuid,
    pub text: &'a str,
}

/// Insertable struct for follower relationships.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}

/// Errors raised when stored rows violate domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored row is invalid: {message}")]
pub(crate) struct RowConversionError {
    pub message: String,
}

impl RowConversionError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, RowConversionError> {
        let username = Username::new(self.username)
            .map_err(|err| RowConversionError::new(format!("user {}: {err}", self.id)))?;
        Ok(User::new(UserId::from_uuid(self.id), username, self.email))
    }
}

impl CredentialsRow {
    pub(crate) fn split(self) -> (UserRow, String) {
        let Self {
            id,
            username,
            email,
            password_hash,
        } = self;
        (
            UserRow {
                id,
                username,
                email,
            },
            password_hash,
        )
    }
}

impl GroupRow {
    pub(crate) fn into_domain(self) -> Result<Group, RowConversionError> {
        let slug = GroupSlug::new(self.slug)
            .map_err(|err| RowConversionError::new(format!("group {}: {err}", self.id)))?;
        Ok(Group::new(
            GroupId::new(self.id),
            self.title,
            slug,
            self.description,
        ))
    }
}

/// Convert a joined post row into the domain read model.
///
/// A stored image path that fails validation is dropped with a warning
/// rather than hiding the whole post.
pub(crate) fn post_from_rows(
    post: PostRow,
    author: UserRow,
    group: Option<GroupRow>,
) -> Result<Post, RowConversionError> {
    let image = post.image.and_then(|raw| match ImagePath::new(raw.clone()) {
        Ok(path) => Some(path),
        Err(err) => {
            warn!(post_id = post.id, path = %raw, error = %err, "ignoring invalid stored image path");
            None
        }
    });
    Ok(Post {
        id: PostId::new(post.id),
        text: post.text,
        pub_date: post.pub_date,
        author: author.into_domain()?,
        group: group.map(GroupRow::into_domain).transpose()?,
        image,
    })
}

/// Convert a joined comment row into the domain read model.
pub(crate) fn comment_from_rows(
    comment: CommentRow,
    author: UserRow,
) -> Result<Comment, RowConversionError> {
    Ok(Comment {
        id: CommentId::new(comment.id),
        post: PostId::new(comment.post_id),
        author: author.into_domain()?,
        text: comment.text,
        created: comment.created,
    })
}
