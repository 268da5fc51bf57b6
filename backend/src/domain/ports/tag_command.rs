//! Driving ports for tag management.
//!
//! Tags are created implicitly through recipe payloads, so there is no
//! create command.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, Tag, TagId, TagName};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagCommand: Send + Sync {
    /// Rename a tag. `None` leaves the name unchanged and returns the tag.
    async fn update(
        &self,
        owner: AccountId,
        id: TagId,
        name: Option<TagName>,
    ) -> Result<Tag, Error>;

    /// Delete a tag, detaching it from every recipe of the owner.
    async fn delete(&self, owner: AccountId, id: TagId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagQuery: Send + Sync {
    /// Tags of `owner`, ordered by name.
    async fn list(&self, owner: AccountId) -> Result<Vec<Tag>, Error>;
}
