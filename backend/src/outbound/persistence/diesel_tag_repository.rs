//! PostgreSQL-backed `TagRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{AccountId, RecipeValidationError, Tag, TagId, TagName};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::TagRow;
use super::pool::{DbPool, PoolError};
use super::schema::tags;

const NAME_CONSTRAINT: &str = "tags_owner_id_name_key";

diesel::define_sql_function! {
    /// SQL `lower()`, used to list tag names case-insensitively.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed implementation of the `TagRepository` port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TagRepositoryError {
    map_basic_pool_error(error, TagRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TagRepositoryError {
    map_basic_diesel_error(
        error,
        TagRepositoryError::query,
        TagRepositoryError::connection,
    )
}

/// Convert a database row to a domain tag.
pub(super) fn row_to_tag(row: TagRow) -> Result<Tag, RecipeValidationError> {
    Ok(Tag {
        id: TagId::new(row.id),
        owner: AccountId::new(row.owner_id),
        name: TagName::new(row.name)?,
    })
}

fn rows_to_tags(rows: Vec<TagRow>) -> Result<Vec<Tag>, TagRepositoryError> {
    rows.into_iter()
        .map(row_to_tag)
        .collect::<Result<_, _>>()
        .map_err(|err| TagRepositoryError::query(format!("stored tag is invalid: {err}")))
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn list(&self, owner: AccountId) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .filter(tags::owner_id.eq(owner.get()))
            .order_by((lower(tags::name).asc(), tags::id.asc()))
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_tags(rows)
    }

    async fn find(&self, owner: AccountId, id: TagId) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .filter(tags::id.eq(id.get()))
            .filter(tags::owner_id.eq(owner.get()))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(rows_to_tags(row.into_iter().collect())?.pop())
    }

    async fn rename(
        &self,
        owner: AccountId,
        id: TagId,
        name: &TagName,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = diesel::update(
            tags::table
                .filter(tags::id.eq(id.get()))
                .filter(tags::owner_id.eq(owner.get())),
        )
        .set(tags::name.eq(name.as_ref()))
        .returning(TagRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| {
            if is_unique_violation(&err, NAME_CONSTRAINT) {
                TagRepositoryError::duplicate_name(name.as_ref())
            } else {
                map_diesel_error(err)
            }
        })?;
        Ok(rows_to_tags(row.into_iter().collect())?.pop())
    }

    async fn delete(&self, owner: AccountId, id: TagId) -> Result<bool, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // `recipe_tags` rows go with the tag through ON DELETE CASCADE.
        let deleted = diesel::delete(
            tags::table
                .filter(tags::id.eq(id.get()))
                .filter(tags::owner_id.eq(owner.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
