//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Feed queries select post rows through one boxed, filtered query and then
//! batch-load the authors and groups the page references, so a page costs
//! three round trips regardless of its length.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::PageWindow;
use uuid::Uuid;

use crate::domain::ports::{PostFilter, PostRepository, PostRepositoryError};
use crate::domain::{Group, Post, PostDraft, PostId, User, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{GroupRow, NewPostRow, PostRow, PostUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, groups, posts, users};

/// Diesel-backed implementation of the [`PostRepository`] port.
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

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

/// Posts matching `filter`, not yet ordered or windowed.
fn filtered(filter: &PostFilter) -> posts::BoxedQuery<'static, Pg> {
    let query = posts::table.into_boxed();
    match filter {
        PostFilter::All => query,
        PostFilter::Group(group) => query.filter(posts::group_id.eq(group.get())),
        PostFilter::Author(author) => query.filter(posts::author_id.eq(*author.as_uuid())),
        PostFilter::FollowedBy(user) => query.filter(
            posts::author_id.eq_any(
                follows::table
                    .filter(follows::user_id.eq(*user.as_uuid()))
                    .select(follows::author_id),
            ),
        ),
    }
}

fn to_sql_bound(value: u64) -> Result<i64, PostRepositoryError> {
    i64::try_from(value).map_err(|err| PostRepositoryError::query(err.to_string()))
}

/// Attach authors and groups to `rows`, preserving their order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<PostRow>,
) -> Result<Vec<Post>, PostRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut author_ids: Vec<Uuid> = rows.iter().map(|row| row.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let authors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(author_ids))
        .select(UserRow::as_select())
        .load::<UserRow>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|row| {
            let id = row.id;
            row.into_user()
                .map(|user| (id, user))
                .map_err(PostRepositoryError::query)
        })
        .collect::<Result<_, _>>()?;

    let mut group_ids: Vec<i32> = rows.iter().filter_map(|row| row.group_id).collect();
    group_ids.sort_unstable();
    group_ids.dedup();
    let groups: HashMap<i32, Group> = if group_ids.is_empty() {
        HashMap::new()
    } else {
        groups::table
            .filter(groups::id.eq_any(group_ids))
            .select(GroupRow::as_select())
            .load::<GroupRow>(conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(|row| {
                let id = row.id;
                row.into_group()
                    .map(|group| (id, group))
                    .map_err(PostRepositoryError::query)
            })
            .collect::<Result<_, _>>()?
    };

    rows.into_iter()
        .map(|row| {
            let author = authors
                .get(&row.author_id)
                .cloned()
                .ok_or_else(|| PostRepositoryError::query("post author missing"))?;
            let group = row
                .group_id
                .map(|id| {
                    groups
                        .get(&id)
                        .cloned()
                        .ok_or_else(|| PostRepositoryError::query("post group missing"))
                })
                .transpose()?;
            let id = row.post_id().map_err(PostRepositoryError::query)?;
            let text = row.post_text().map_err(PostRepositoryError::query)?;
            Ok(Post::new(id, author, text, group, row.image, row.created_at))
        })
        .collect()
}

async fn hydrate_one(
    conn: &mut AsyncPgConnection,
    row: PostRow,
) -> Result<Post, PostRepositoryError> {
    hydrate(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| PostRepositoryError::query("failed to load stored post"))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = posts::table
            .find(id.get())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => Ok(Some(hydrate_one(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(count).map_err(|err| PostRepositoryError::query(err.to_string()))
    }

    async fn list(
        &self,
        filter: &PostFilter,
        window: PageWindow,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostRow> = filtered(filter)
            .order((posts::created_at.desc(), posts::id.desc()))
            .offset(to_sql_bound(window.offset())?)
            .limit(to_sql_bound(window.limit())?)
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn create(&self, author: &UserId, draft: &PostDraft) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(posts::table)
            .values(&NewPostRow {
                text: draft.text().as_ref(),
                author_id: *author.as_uuid(),
                group_id: draft.group().map(|group| group.get()),
                image: draft.image(),
            })
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate_one(&mut conn, row).await
    }

    async fn update(&self, id: PostId, draft: &PostDraft) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(posts::table.find(id.get()))
            .set(&PostUpdate {
                text: draft.text().as_ref(),
                group_id: draft.group().map(|group| group.get()),
                image: draft.image(),
            })
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate_one(&mut conn, row).await
    }
}
