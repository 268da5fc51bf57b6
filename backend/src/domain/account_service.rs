//! Account management service.
//!
//! Implements [`AccountCommand`] and [`AccountQuery`] on top of an
//! [`AccountRepository`], and exposes the privileged `create_user` /
//! `create_superuser` entry points used by the management binary.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, AccountQuery, AccountRepository, AccountRepositoryError, ProfileUpdate,
    SignupRequest,
};
use crate::domain::{
    Account, AccountFlags, AccountId, AccountName, AccountValidationError, Email, Error,
    NewAccount, PasswordHash, PlainPassword, field_error,
};

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<R> {
    accounts: Arc<R>,
}

impl<R> AccountService<R> {
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    fn map_repository_error(error: AccountRepositoryError) -> Error {
        match error {
            AccountRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("account repository unavailable: {message}"))
            }
            AccountRepositoryError::Query { message } => {
                Error::internal(format!("account repository error: {message}"))
            }
            AccountRepositoryError::DuplicateEmail { .. } => Self::duplicate_email(),
            AccountRepositoryError::NotFound { .. } => Self::account_not_found(),
        }
    }

    fn duplicate_email() -> Error {
        field_error(
            "email",
            "duplicate_email",
            "an account with this email already exists",
        )
    }

    fn account_not_found() -> Error {
        Error::not_found("account not found")
    }

    async fn hash(password: &PlainPassword) -> Result<PasswordHash, Error> {
        PasswordHash::hash_blocking(password.clone())
            .await
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
    }

    fn email_error(error: AccountValidationError) -> Error {
        let code = match error {
            AccountValidationError::EmptyEmail => "required",
            AccountValidationError::EmailTooLong { .. } => "max_length",
            _ => "invalid",
        };
        field_error("email", code, error.to_string())
    }

    /// Create a regular account.
    ///
    /// Only emptiness is checked on the email; the domain part is lowercased
    /// and the password is stored as an Argon2 hash. No length policy applies
    /// to passwords set here.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for an empty or duplicate email.
    pub async fn create_user(
        &self,
        email: &str,
        password: &PlainPassword,
        name: AccountName,
    ) -> Result<Account, Error> {
        let email = Email::normalise(email).map_err(Self::email_error)?;
        self.create_account(email, name, password, AccountFlags::REGULAR)
            .await
    }

    /// Create an account with the staff and superuser flags set.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: &PlainPassword,
    ) -> Result<Account, Error> {
        let email = Email::normalise(email).map_err(Self::email_error)?;
        self.create_account(email, AccountName::default(), password, AccountFlags::SUPERUSER)
            .await
    }

    async fn create_account(
        &self,
        email: Email,
        name: AccountName,
        password: &PlainPassword,
        flags: AccountFlags,
    ) -> Result<Account, Error> {
        let new_account = NewAccount {
            email,
            name,
            password_hash: Self::hash(password).await?,
            flags,
        };
        let account = self
            .accounts
            .insert(&new_account)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            account_id = %account.id(),
            is_superuser = account.is_superuser(),
            "account created"
        );
        Ok(account)
    }

    async fn fetch(&self, id: AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(Self::account_not_found)
    }

    async fn ensure_email_available(&self, email: &Email, owner: AccountId) -> Result<(), Error> {
        let existing = self
            .accounts
            .find_by_email(email)
            .await
            .map_err(Self::map_repository_error)?;
        match existing {
            Some(other) if other.id() != owner => Err(Self::duplicate_email()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> AccountCommand for AccountService<R>
where
    R: AccountRepository,
{
    async fn register(&self, request: SignupRequest) -> Result<Account, Error> {
        let SignupRequest {
            email,
            name,
            password,
        } = request;
        self.create_account(email, name, &password, AccountFlags::REGULAR)
            .await
    }

    async fn update_profile(
        &self,
        account: AccountId,
        update: ProfileUpdate,
    ) -> Result<Account, Error> {
        let mut current = self.fetch(account).await?;
        let ProfileUpdate {
            email,
            name,
            password,
        } = update;

        if let Some(email) = email {
            if &email != current.email() {
                self.ensure_email_available(&email, account).await?;
            }
            current.set_email(email);
        }
        if let Some(name) = name {
            current.set_name(name);
        }
        if let Some(password) = password {
            current.set_password_hash(Self::hash(&password).await?);
            debug!(account_id = %account, "password changed");
        }

        self.accounts
            .update(&current)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(current)
    }
}

#[async_trait]
impl<R> AccountQuery for AccountService<R>
where
    R: AccountRepository,
{
    async fn profile(&self, account: AccountId) -> Result<Account, Error> {
        self.fetch(account).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
