//! Domain primitives, ports and services.
//!
//! Purpose: define the blog's entities (users, groups, posts, comments,
//! follows), the ports the domain talks through, and the services that
//! implement the driving ports. Nothing here imports a web framework or an
//! ORM; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Post, Comment, Group, User: read models joined for rendering.
//! - FeedQueryService, PostCommandService, FollowCommandService,
//!   PasswordLoginService, AdminService: use-case implementations.

pub mod admin_service;
pub mod auth;
pub mod comment;
pub mod error;
pub mod feed_service;
pub mod follow;
pub mod follow_service;
pub mod group;
pub mod image;
pub mod login_service;
pub mod ports;
pub mod post;
pub mod post_service;
mod repository_errors;
mod slug;
pub mod trace_id;
pub mod user;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::admin_service::{AdminService, PASSWORD_HASH_COST};
pub use self::auth::{LoginCredentials, LoginValidationError, PasswordHash, PasswordHashError};
pub use self::comment::{Comment, CommentId, NewComment};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::feed_service::{
    COMMENTS_PAGE_SIZE, FEED_PAGE_SIZE, FeedQueryService, PROFILE_PAGE_SIZE,
};
pub use self::follow::{FollowCounts, FollowEdge, FollowValidationError};
pub use self::follow_service::FollowCommandService;
pub use self::group::{Group, GroupId, GroupSlug, GroupValidationError, NewGroup};
pub use self::image::{ImageFormat, ImagePath, ImagePathError, ImageUpload, ImageValidationError};
pub use self::login_service::PasswordLoginService;
pub use self::post::{BodyText, NewPost, Post, PostChanges, PostDraft, PostFilter, PostId};
pub use self::post_service::PostCommandService;
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, User, UserId, UserValidationError, Username};
pub use self::validation::{FieldErrors, Submission};

/// Convenient result alias for handlers and services.
///
/// # Examples
/// ```
/// use yatube::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
