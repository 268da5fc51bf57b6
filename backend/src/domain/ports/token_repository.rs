//! Port abstraction for bearer token storage.
//!
//! Adapters only ever see token digests; the plaintext token is returned to
//! the client once and never persisted.

use async_trait::async_trait;

use crate::domain::{AccountId, TokenDigest};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by token repository adapters.
    pub enum TokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Bind `digest` to `account`, discarding any digest bound before.
    async fn replace(
        &self,
        account: AccountId,
        digest: &TokenDigest,
    ) -> Result<(), TokenRepositoryError>;

    /// Resolve a digest to the account that owns it.
    async fn resolve(&self, digest: &TokenDigest)
    -> Result<Option<AccountId>, TokenRepositoryError>;
}
