//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Listings join each post to its author and (optionally) its group in one
//! query and order by `pub_date DESC, id DESC`.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::Window;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{NewPost, Post, PostChanges, PostFilter, PostId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{count_to_usize, window_bounds};
use super::models::{GroupRow, NewPostRow, PostRow, UserRow, post_from_rows};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, groups, posts, users};

/// Narrow a boxed `posts` query (joined or not) to the rows a filter covers.
macro_rules! filter_posts {
    ($query:expr, $filter:expr) => {
        match $filter {
            PostFilter::All => $query,
            PostFilter::Group(group) => $query.filter(posts::group_id.eq(group.get())),
            PostFilter::Author(author) => $query.filter(posts::author_id.eq(*author.as_uuid())),
            PostFilter::FollowedBy(follower) => $query.filter(
                posts::author_id.eq_any(
                    follows::table
                        .filter(follows::user_id.eq(*follower.as_uuid()))
                        .select(follows::author_id),
                ),
            ),
        }
    };
}

type JoinedPostRow = (PostRow, UserRow, Option<GroupRow>);

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    map_basic_pool_error(error, PostPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    map_basic_diesel_error(
        error,
        PostPersistenceError::query,
        PostPersistenceError::connection,
    )
}

fn to_domain((post, author, group): JoinedPostRow) -> Result<Post, PostPersistenceError> {
    post_from_rows(post, author, group).map_err(|err| PostPersistenceError::query(err.to_string()))
}

async fn load_joined(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<Post>, PostPersistenceError> {
    let row = posts::table
        .inner_join(users::table)
        .left_join(groups::table)
        .filter(posts::id.eq(id))
        .select((
            PostRow::as_select(),
            UserRow::as_select(),
            groups::all_columns.nullable(),
        ))
        .first::<JoinedPostRow>(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(to_domain).transpose()
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn count(&self, filter: &PostFilter) -> Result<usize, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = posts::table.select(count_star()).into_boxed();
        let total: i64 = filter_posts!(query, filter)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_usize(total))
    }

    async fn list(
        &self,
        filter: &PostFilter,
        window: Window,
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = window_bounds(window);
        let query = posts::table
            .inner_join(users::table)
            .left_join(groups::table)
            .select((
                PostRow::as_select(),
                UserRow::as_select(),
                groups::all_columns.nullable(),
            ))
            .into_boxed();
        let rows: Vec<JoinedPostRow> = filter_posts!(query, filter)
            .order((posts::pub_date.desc(), posts::id.desc()))
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_joined(&mut conn, id.get()).await
    }

    async fn insert(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            text: post.text.as_str(),
            author_id: *post.author.as_uuid(),
            group_id: post.group.map(|group| group.get()),
            image: post.image.as_ref().map(|path| path.as_str()),
        };
        let id: i64 = diesel::insert_into(posts::table)
            .values(&row)
            .returning(posts::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_joined(&mut conn, id)
            .await?
            .ok_or_else(|| PostPersistenceError::query("inserted post vanished"))
    }

    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = posts::table.find(id.get());
        let base = (
            posts::text.eq(changes.text.as_str()),
            posts::group_id.eq(changes.group.map(|group| group.get())),
            posts::author_id.eq(*changes.author.as_uuid()),
        );
        let updated = match &changes.image {
            Some(image) => {
                diesel::update(target)
                    .set((base, posts::image.eq(Some(image.as_str()))))
                    .execute(&mut conn)
                    .await
            }
            None => diesel::update(target).set(base).execute(&mut conn).await,
        }
        .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_joined(&mut conn, id.get()).await
    }
}
