//! Translation of driven-port failures into domain errors.
//!
//! Connection failures become `ServiceUnavailable`; everything else is an
//! internal error whose message is logged but never shown to visitors.

use super::Error;
use super::ports::{
    CommentPersistenceError, FollowPersistenceError, GroupPersistenceError, MediaStoreError,
    PostPersistenceError, UserPersistenceError,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { message } => {
            Error::invalid_request(format!("user already exists: {message}"))
        }
    }
}

pub(crate) fn map_group_error(error: GroupPersistenceError) -> Error {
    match error {
        GroupPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("group repository unavailable: {message}"))
        }
        GroupPersistenceError::Query { message } => {
            Error::internal(format!("group repository error: {message}"))
        }
        GroupPersistenceError::Conflict { message } => {
            Error::invalid_request(format!("group already exists: {message}"))
        }
    }
}

pub(crate) fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

pub(crate) fn map_comment_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

pub(crate) fn map_follow_error(error: FollowPersistenceError) -> Error {
    match error {
        FollowPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("follow repository unavailable: {message}"))
        }
        FollowPersistenceError::Query { message } => {
            Error::internal(format!("follow repository error: {message}"))
        }
    }
}

pub(crate) fn map_media_error(error: MediaStoreError) -> Error {
    match error {
        MediaStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("media storage unavailable: {message}"))
        }
        MediaStoreError::Write { message } => {
            Error::internal(format!("media write failed: {message}"))
        }
    }
}
