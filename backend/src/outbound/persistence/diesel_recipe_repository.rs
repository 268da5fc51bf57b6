//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Writes that touch tags run inside one transaction: tag names are
//! get-or-created for the owner, then the recipe's links in `recipe_tags`
//! are replaced wholesale.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError, RecipeWrite};
use crate::domain::{
    AccountId, Price, Recipe, RecipeFields, RecipeId, RecipeLink, RecipeTitle,
    RecipeValidationError, TagName, TimeMinutes,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_tag_repository::{lower, row_to_tag};
use super::models::{NewRecipeRow, NewTagRow, RecipeRow, RecipeTagRow, RecipeUpdate, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{recipe_tags, recipes, tags};

type RecipeRows = (RecipeRow, Vec<TagRow>);

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn row_to_recipe(row: RecipeRow, tag_rows: Vec<TagRow>) -> Result<Recipe, RecipeRepositoryError> {
    let recipe_id = row.id;
    let invalid = |err: RecipeValidationError| {
        warn!(recipe_id, field = err.field(), "stored recipe row failed validation");
        RecipeRepositoryError::query(format!("stored recipe is invalid: {err}"))
    };
    let fields = RecipeFields {
        title: RecipeTitle::new(&row.title).map_err(invalid)?,
        time_minutes: TimeMinutes::new(row.time_minutes).map_err(invalid)?,
        price: Price::new(row.price).map_err(invalid)?,
        link: RecipeLink::new(row.link).map_err(invalid)?,
        description: row.description,
    };
    let tags = tag_rows
        .into_iter()
        .map(row_to_tag)
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;
    Ok(Recipe {
        id: RecipeId::new(row.id),
        owner: AccountId::new(row.owner_id),
        fields,
        tags,
    })
}

fn new_row<'a>(owner_id: i64, fields: &'a RecipeFields) -> NewRecipeRow<'a> {
    NewRecipeRow {
        owner_id,
        title: fields.title.as_ref(),
        time_minutes: fields.time_minutes.get(),
        price: fields.price.get(),
        link: fields.link.as_ref(),
        description: &fields.description,
    }
}

fn changes(fields: &RecipeFields) -> RecipeUpdate<'_> {
    RecipeUpdate {
        title: fields.title.as_ref(),
        time_minutes: fields.time_minutes.get(),
        price: fields.price.get(),
        link: fields.link.as_ref(),
        description: &fields.description,
    }
}

/// Resolve tag names to ids for `owner_id`, creating the missing ones.
async fn get_or_create_tags(
    conn: &mut AsyncPgConnection,
    owner_id: i64,
    names: &[TagName],
) -> QueryResult<Vec<i64>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<NewTagRow<'_>> = names
        .iter()
        .map(|name| NewTagRow {
            owner_id,
            name: name.as_ref(),
        })
        .collect();
    diesel::insert_into(tags::table)
        .values(&rows)
        .on_conflict((tags::owner_id, tags::name))
        .do_nothing()
        .execute(conn)
        .await?;

    let wanted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    tags::table
        .filter(tags::owner_id.eq(owner_id))
        .filter(tags::name.eq_any(wanted))
        .select(tags::id)
        .load(conn)
        .await
}

/// Replace the tag links of `recipe_id` with `names`.
async fn relink_tags(
    conn: &mut AsyncPgConnection,
    owner_id: i64,
    recipe_id: i64,
    names: &[TagName],
) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    let links: Vec<RecipeTagRow> = get_or_create_tags(conn, owner_id, names)
        .await?
        .into_iter()
        .map(|tag_id| RecipeTagRow { recipe_id, tag_id })
        .collect();
    if !links.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(&links)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Load the tags attached to each of `recipe_ids` in listing order.
async fn tags_by_recipe(
    conn: &mut AsyncPgConnection,
    recipe_ids: Vec<i64>,
) -> QueryResult<HashMap<i64, Vec<TagRow>>> {
    let pairs: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order_by((lower(tags::name).asc(), tags::id.asc()))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;
    let mut grouped: HashMap<i64, Vec<TagRow>> = HashMap::new();
    for (recipe_id, tag) in pairs {
        grouped.entry(recipe_id).or_default().push(tag);
    }
    Ok(grouped)
}

async fn with_tags(conn: &mut AsyncPgConnection, row: RecipeRow) -> QueryResult<RecipeRows> {
    let mut grouped = tags_by_recipe(conn, vec![row.id]).await?;
    let tags = grouped.remove(&row.id).unwrap_or_default();
    Ok((row, tags))
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(&self, owner: AccountId) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(RecipeRow, Vec<TagRow>)> = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let rows: Vec<RecipeRow> = recipes::table
                        .filter(recipes::owner_id.eq(owner.get()))
                        .order_by(recipes::id.desc())
                        .select(RecipeRow::as_select())
                        .load(conn)
                        .await?;
                    let ids = rows.iter().map(|row| row.id).collect();
                    let mut grouped = tags_by_recipe(conn, ids).await?;
                    Ok(rows
                        .into_iter()
                        .map(|row| {
                            let tags = grouped.remove(&row.id).unwrap_or_default();
                            (row, tags)
                        })
                        .collect())
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, tags)| row_to_recipe(row, tags))
            .collect()
    }

    async fn find(
        &self,
        owner: AccountId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<RecipeRows> = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row: Option<RecipeRow> = recipes::table
                        .filter(recipes::id.eq(id.get()))
                        .filter(recipes::owner_id.eq(owner.get()))
                        .select(RecipeRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    match row {
                        Some(row) => with_tags(conn, row).await.map(Some),
                        None => Ok(None),
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        found
            .map(|(row, tags)| row_to_recipe(row, tags))
            .transpose()
    }

    async fn insert(
        &self,
        owner: AccountId,
        recipe: &RecipeWrite,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (row, tags) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row(owner.get(), &recipe.fields))
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    if let Some(names) = &recipe.tags {
                        relink_tags(conn, owner.get(), row.id, names).await?;
                    }
                    with_tags(conn, row).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_recipe(row, tags)
    }

    async fn update(
        &self,
        owner: AccountId,
        id: RecipeId,
        recipe: &RecipeWrite,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<RecipeRows> = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row: Option<RecipeRow> = diesel::update(
                        recipes::table
                            .filter(recipes::id.eq(id.get()))
                            .filter(recipes::owner_id.eq(owner.get())),
                    )
                    .set(&changes(&recipe.fields))
                    .returning(RecipeRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    if let Some(names) = &recipe.tags {
                        relink_tags(conn, owner.get(), row.id, names).await?;
                    }
                    with_tags(conn, row).await.map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        updated
            .map(|(row, tags)| row_to_recipe(row, tags))
            .transpose()
    }

    async fn delete(&self, owner: AccountId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::owner_id.eq(owner.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
