//! Driving ports for recipe management.

use async_trait::async_trait;

use crate::domain::{
    AccountId, Error, Price, Recipe, RecipeFieldsPatch, RecipeId, RecipeLink, RecipeTitle,
    TagName, TimeMinutes,
};

use super::RecipeWrite;

/// Partial recipe update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub fields: RecipeFieldsPatch,
    /// Replacement tag set; `None` keeps the current tags.
    pub tags: Option<Vec<TagName>>,
}

/// Full recipe update.
///
/// Title, time and price are always supplied. `link`, `description` and
/// `tags` left as `None` keep their stored values, so a replacement never
/// blanks what the caller did not send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeReplacement {
    pub title: RecipeTitle,
    pub time_minutes: TimeMinutes,
    pub price: Price,
    pub link: Option<RecipeLink>,
    pub description: Option<String>,
    pub tags: Option<Vec<TagName>>,
}

impl From<RecipeReplacement> for RecipePatch {
    fn from(replacement: RecipeReplacement) -> Self {
        let RecipeReplacement {
            title,
            time_minutes,
            price,
            link,
            description,
            tags,
        } = replacement;
        Self {
            fields: RecipeFieldsPatch {
                title: Some(title),
                time_minutes: Some(time_minutes),
                price: Some(price),
                link,
                description,
            },
            tags,
        }
    }
}

/// Commands over the caller's recipes. A recipe owned by someone else is
/// reported as `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Create a recipe owned by `owner`.
    async fn create(&self, owner: AccountId, recipe: RecipeWrite) -> Result<Recipe, Error>;

    /// Full update (PUT semantics); see [`RecipeReplacement`].
    async fn replace(
        &self,
        owner: AccountId,
        id: RecipeId,
        recipe: RecipeReplacement,
    ) -> Result<Recipe, Error>;

    /// Partial update (PATCH semantics).
    async fn patch(
        &self,
        owner: AccountId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, Error>;

    async fn delete(&self, owner: AccountId, id: RecipeId) -> Result<(), Error>;
}

/// Queries over the caller's recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Recipes of `owner`, newest first.
    async fn list(&self, owner: AccountId) -> Result<Vec<Recipe>, Error>;

    async fn get(&self, owner: AccountId, id: RecipeId) -> Result<Recipe, Error>;
}
