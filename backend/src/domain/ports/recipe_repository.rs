//! Port abstraction for owner-scoped recipe storage.

use async_trait::async_trait;

use crate::domain::{AccountId, Recipe, RecipeFields, RecipeId, TagName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

/// Recipe contents to write.
///
/// `tags` lists tag names resolved against the owner's tags, creating any
/// that are missing. `None` leaves the current tag set untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeWrite {
    pub fields: RecipeFields,
    pub tags: Option<Vec<TagName>>,
}

/// Every method takes the owner; adapters must never return or touch another
/// account's rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// All recipes of `owner`, newest (highest id) first.
    async fn list(&self, owner: AccountId) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    async fn find(
        &self,
        owner: AccountId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    async fn insert(
        &self,
        owner: AccountId,
        recipe: &RecipeWrite,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Replace the stored fields; returns `None` when the recipe is not the
    /// owner's.
    async fn update(
        &self,
        owner: AccountId,
        id: RecipeId,
        recipe: &RecipeWrite,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Returns whether a recipe was deleted.
    async fn delete(&self, owner: AccountId, id: RecipeId) -> Result<bool, RecipeRepositoryError>;
}
