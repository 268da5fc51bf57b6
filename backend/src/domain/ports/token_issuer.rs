//! Driving port for bearer token issuance and resolution.
//!
//! Inbound adapters exchange credentials for tokens here and resolve the
//! `Authorization` header of every protected request through the same port.

use async_trait::async_trait;

use crate::domain::{AccountId, AuthToken, Error, TokenCredentials};

/// Message shared by every credential failure so callers cannot tell which
/// part was wrong.
pub const INVALID_CREDENTIALS: &str = "unable to authenticate with provided credentials";

/// Message shared by every token failure.
pub const INVALID_TOKEN: &str = "invalid or missing authentication token";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Verify credentials and return a fresh token, replacing any previous
    /// token of the same account.
    ///
    /// # Errors
    ///
    /// Unknown emails, wrong passwords and inactive accounts all yield the
    /// same `invalid_request` error carrying [`INVALID_CREDENTIALS`].
    async fn issue(&self, credentials: &TokenCredentials) -> Result<AuthToken, Error>;

    /// Resolve a presented token to an active account.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` with [`INVALID_TOKEN`] for unknown tokens and
    /// tokens of inactive accounts.
    async fn authenticate(&self, token: &AuthToken) -> Result<AccountId, Error>;
}
