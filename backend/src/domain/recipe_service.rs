//! Recipe service.
//!
//! Every operation is scoped to the calling account. Recipes of other
//! accounts are indistinguishable from missing ones.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    RecipeCommand, RecipePatch, RecipeQuery, RecipeReplacement, RecipeRepository,
    RecipeRepositoryError, RecipeWrite,
};
use crate::domain::{AccountId, Error, Recipe, RecipeId, recipe::dedup_tag_names};

#[derive(Clone)]
pub struct RecipeService<R> {
    recipes: Arc<R>,
}

impl<R> RecipeService<R> {
    pub fn new(recipes: Arc<R>) -> Self {
        Self { recipes }
    }
}

impl<R> RecipeService<R>
where
    R: RecipeRepository,
{
    fn map_repository_error(error: RecipeRepositoryError) -> Error {
        match error {
            RecipeRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("recipe repository unavailable: {message}"))
            }
            RecipeRepositoryError::Query { message } => {
                Error::internal(format!("recipe repository error: {message}"))
            }
        }
    }

    fn not_found() -> Error {
        Error::not_found("recipe not found")
    }

    fn normalise(mut recipe: RecipeWrite) -> RecipeWrite {
        recipe.tags = recipe.tags.map(dedup_tag_names);
        recipe
    }

    async fn write(
        &self,
        owner: AccountId,
        id: RecipeId,
        recipe: RecipeWrite,
    ) -> Result<Recipe, Error> {
        self.recipes
            .update(owner, id, &Self::normalise(recipe))
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(Self::not_found)
    }
}

#[async_trait]
impl<R> RecipeCommand for RecipeService<R>
where
    R: RecipeRepository,
{
    async fn create(&self, owner: AccountId, recipe: RecipeWrite) -> Result<Recipe, Error> {
        let created = self
            .recipes
            .insert(owner, &Self::normalise(recipe))
            .await
            .map_err(Self::map_repository_error)?;
        debug!(recipe_id = %created.id, owner = %owner, "recipe created");
        Ok(created)
    }

    async fn replace(
        &self,
        owner: AccountId,
        id: RecipeId,
        recipe: RecipeReplacement,
    ) -> Result<Recipe, Error> {
        self.patch(owner, id, RecipePatch::from(recipe)).await
    }

    async fn patch(
        &self,
        owner: AccountId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, Error> {
        let current = self.get(owner, id).await?;
        let RecipePatch { fields, tags } = patch;
        let mut merged = current.fields;
        merged.apply(fields);
        self.write(
            owner,
            id,
            RecipeWrite {
                fields: merged,
                tags,
            },
        )
        .await
    }

    async fn delete(&self, owner: AccountId, id: RecipeId) -> Result<(), Error> {
        let deleted = self
            .recipes
            .delete(owner, id)
            .await
            .map_err(Self::map_repository_error)?;
        if !deleted {
            return Err(Self::not_found());
        }
        debug!(recipe_id = %id, owner = %owner, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> RecipeQuery for RecipeService<R>
where
    R: RecipeRepository,
{
    async fn list(&self, owner: AccountId) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list(owner)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get(&self, owner: AccountId, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(owner, id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(Self::not_found)
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
