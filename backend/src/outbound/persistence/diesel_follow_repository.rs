//! PostgreSQL-backed `FollowRepository` implementation using Diesel ORM.
//!
//! The `follows_user_author_unique` constraint makes inserts idempotent via
//! `ON CONFLICT DO NOTHING`.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FollowPersistenceError, FollowRepository};
use crate::domain::{FollowCounts, FollowEdge, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::count_to_usize;
use super::models::NewFollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::follows;

/// Diesel-backed implementation of the `FollowRepository` port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowPersistenceError {
    map_basic_pool_error(error, FollowPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FollowPersistenceError {
    map_basic_diesel_error(
        error,
        FollowPersistenceError::query,
        FollowPersistenceError::connection,
    )
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn exists(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            follows::table
                .filter(follows::user_id.eq(*edge.follower().as_uuid()))
                .filter(follows::author_id.eq(*edge.author().as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFollowRow {
            user_id: *edge.follower().as_uuid(),
            author_id: *edge.author().as_uuid(),
        };
        let inserted = diesel::insert_into(follows::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn delete(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            follows::table
                .filter(follows::user_id.eq(*edge.follower().as_uuid()))
                .filter(follows::author_id.eq(*edge.author().as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let followers: i64 = follows::table
            .filter(follows::author_id.eq(*user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let following: i64 = follows::table
            .filter(follows::user_id.eq(*user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(FollowCounts {
            followers: count_to_usize(followers),
            following: count_to_usize(following),
        })
    }
}
