//! Tag service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{TagCommand, TagQuery, TagRepository, TagRepositoryError};
use crate::domain::{AccountId, Error, Tag, TagId, TagName, field_error};

#[derive(Clone)]
pub struct TagService<T> {
    tags: Arc<T>,
}

impl<T> TagService<T> {
    pub fn new(tags: Arc<T>) -> Self {
        Self { tags }
    }
}

impl<T> TagService<T>
where
    T: TagRepository,
{
    fn map_repository_error(error: TagRepositoryError) -> Error {
        match error {
            TagRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("tag repository unavailable: {message}"))
            }
            TagRepositoryError::Query { message } => {
                Error::internal(format!("tag repository error: {message}"))
            }
            TagRepositoryError::DuplicateName { name } => field_error(
                "name",
                "duplicate_name",
                format!("a tag named {name} already exists"),
            ),
        }
    }

    fn not_found() -> Error {
        Error::not_found("tag not found")
    }
}

#[async_trait]
impl<T> TagCommand for TagService<T>
where
    T: TagRepository,
{
    async fn update(
        &self,
        owner: AccountId,
        id: TagId,
        name: Option<TagName>,
    ) -> Result<Tag, Error> {
        let tag = match name {
            Some(name) => self.tags.rename(owner, id, &name).await,
            None => self.tags.find(owner, id).await,
        };
        tag.map_err(Self::map_repository_error)?
            .ok_or_else(Self::not_found)
    }

    async fn delete(&self, owner: AccountId, id: TagId) -> Result<(), Error> {
        let deleted = self
            .tags
            .delete(owner, id)
            .await
            .map_err(Self::map_repository_error)?;
        if !deleted {
            return Err(Self::not_found());
        }
        debug!(tag_id = %id, owner = %owner, "tag deleted");
        Ok(())
    }
}

#[async_trait]
impl<T> TagQuery for TagService<T>
where
    T: TagRepository,
{
    async fn list(&self, owner: AccountId) -> Result<Vec<Tag>, Error> {
        self.tags
            .list(owner)
            .await
            .map_err(Self::map_repository_error)
    }
}
