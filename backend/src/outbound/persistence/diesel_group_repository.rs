//! PostgreSQL-backed `GroupRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GroupPersistenceError, GroupRepository};
use crate::domain::{Group, GroupId, GroupSlug, NewGroup};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_unique_diesel_error,
};
use super::models::{GroupRow, NewGroupRow};
use super::pool::{DbPool, PoolError};
use super::schema::groups;

/// Diesel-backed implementation of the `GroupRepository` port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupPersistenceError {
    map_basic_pool_error(error, GroupPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GroupPersistenceError {
    map_basic_diesel_error(
        error,
        GroupPersistenceError::query,
        GroupPersistenceError::connection,
    )
}

fn to_domain(row: GroupRow) -> Result<Group, GroupPersistenceError> {
    row.into_domain()
        .map_err(|err| GroupPersistenceError::query(err.to_string()))
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = groups::table
            .filter(groups::slug.eq(slug.as_str()))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = groups::table
            .find(id.get())
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Group>, GroupPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = groups::table
            .order((groups::title.asc(), groups::id.asc()))
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn insert(&self, group: &NewGroup) -> Result<Group, GroupPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewGroupRow {
            title: group.title(),
            slug: group.slug().as_str(),
            description: group.description(),
        };
        let stored = diesel::insert_into(groups::table)
            .values(&row)
            .returning(GroupRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                map_unique_diesel_error(
                    err,
                    GroupPersistenceError::query,
                    GroupPersistenceError::connection,
                    GroupPersistenceError::conflict,
                )
            })?;
        to_domain(stored)
    }
}
