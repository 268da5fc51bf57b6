//! Port abstraction for owner-scoped tag storage.

use async_trait::async_trait;

use crate::domain::{AccountId, Tag, TagId, TagName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
        /// The owner already has a tag with this name.
        DuplicateName { name: String } => "a tag named {name} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags of `owner`, by name ignoring case, ties broken by id.
    async fn list(&self, owner: AccountId) -> Result<Vec<Tag>, TagRepositoryError>;

    async fn find(&self, owner: AccountId, id: TagId) -> Result<Option<Tag>, TagRepositoryError>;

    /// Rename a tag; returns `None` when the tag is not the owner's.
    async fn rename(
        &self,
        owner: AccountId,
        id: TagId,
        name: &TagName,
    ) -> Result<Option<Tag>, TagRepositoryError>;

    /// Delete a tag and detach it from the owner's recipes.
    async fn delete(&self, owner: AccountId, id: TagId) -> Result<bool, TagRepositoryError>;
}
