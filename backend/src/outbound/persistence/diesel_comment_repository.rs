//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Window;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, NewComment, PostId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{count_to_usize, window_bounds};
use super::models::{CommentRow, NewCommentRow, UserRow, comment_from_rows};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    map_basic_pool_error(error, CommentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    map_basic_diesel_error(
        error,
        CommentPersistenceError::query,
        CommentPersistenceError::connection,
    )
}

fn to_domain((comment, author): (CommentRow, UserRow)) -> Result<Comment, CommentPersistenceError> {
    comment_from_rows(comment, author)
        .map_err(|err| CommentPersistenceError::query(err.to_string()))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn count_for_post(&self, post: PostId) -> Result<usize, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = comments::table
            .filter(comments::post_id.eq(post.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_usize(total))
    }

    async fn list_for_post(
        &self,
        post: PostId,
        window: Window,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = window_bounds(window);
        let rows: Vec<(CommentRow, UserRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post.get()))
            .order((comments::created.desc(), comments::id.desc()))
            .offset(offset)
            .limit(limit)
            .select((CommentRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            post_id: comment.post.get(),
            author_id: *comment.author.as_uuid(),
            text: comment.text.as_str(),
        };
        let stored: CommentRow = diesel::insert_into(comments::table)
            .values(&row)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let author: UserRow = users::table
            .find(*comment.author.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_domain((stored, author))
    }
}
