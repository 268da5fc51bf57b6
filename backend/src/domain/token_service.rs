//! Bearer token issuance and resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, INVALID_CREDENTIALS, INVALID_TOKEN,
    TokenIssuer, TokenRepository, TokenRepositoryError,
};
use crate::domain::{AccountId, AuthToken, Email, Error, PasswordHash, TokenCredentials};

/// Token service implementing [`TokenIssuer`].
#[derive(Clone)]
pub struct TokenService<A, T> {
    accounts: Arc<A>,
    tokens: Arc<T>,
}

impl<A, T> TokenService<A, T> {
    pub fn new(accounts: Arc<A>, tokens: Arc<T>) -> Self {
        Self { accounts, tokens }
    }
}

impl<A, T> TokenService<A, T>
where
    A: AccountRepository,
    T: TokenRepository,
{
    fn map_account_error(error: AccountRepositoryError) -> Error {
        match error {
            AccountRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("account repository unavailable: {message}"))
            }
            other => Error::internal(format!("account repository error: {other}")),
        }
    }

    fn map_token_error(error: TokenRepositoryError) -> Error {
        match error {
            TokenRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("token repository unavailable: {message}"))
            }
            TokenRepositoryError::Query { message } => {
                Error::internal(format!("token repository error: {message}"))
            }
        }
    }

    fn invalid_credentials() -> Error {
        Error::invalid_request(INVALID_CREDENTIALS)
    }

    fn invalid_token() -> Error {
        Error::unauthorized(INVALID_TOKEN)
    }
}

#[async_trait]
impl<A, T> TokenIssuer for TokenService<A, T>
where
    A: AccountRepository,
    T: TokenRepository,
{
    async fn issue(&self, credentials: &TokenCredentials) -> Result<AuthToken, Error> {
        let Ok(email) = Email::normalise(credentials.email()) else {
            return Err(Self::invalid_credentials());
        };
        let account = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(Self::map_account_error)?;

        // Unknown emails are verified against a decoy so both failures cost the same.
        let stored = account.as_ref().map(|found| found.password_hash().clone());
        let matches =
            PasswordHash::verify_blocking(stored, credentials.password().clone()).await;
        let Some(account) = account else {
            debug!("token request for unknown account");
            return Err(Self::invalid_credentials());
        };
        if !matches {
            debug!(account_id = %account.id(), "token request with wrong password");
            return Err(Self::invalid_credentials());
        }
        if !account.is_active() {
            warn!(account_id = %account.id(), "token request for inactive account");
            return Err(Self::invalid_credentials());
        }

        let token = AuthToken::generate();
        self.tokens
            .replace(account.id(), &token.digest())
            .await
            .map_err(Self::map_token_error)?;
        debug!(account_id = %account.id(), "token issued");
        Ok(token)
    }

    async fn authenticate(&self, token: &AuthToken) -> Result<AccountId, Error> {
        if token.expose().is_empty() {
            return Err(Self::invalid_token());
        }
        let Some(account_id) = self
            .tokens
            .resolve(&token.digest())
            .await
            .map_err(Self::map_token_error)?
        else {
            return Err(Self::invalid_token());
        };

        let account = self
            .accounts
            .find_by_id(account_id)
            .await
            .map_err(Self::map_account_error)?;
        match account {
            Some(account) if account.is_active() => Ok(account.id()),
            _ => Err(Self::invalid_token()),
        }
    }
}
