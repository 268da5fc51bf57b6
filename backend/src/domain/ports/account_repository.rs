//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Email, NewAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "an account with email {email} already exists",
        /// The account to update no longer exists.
        NotFound { id: i64 } => "account {id} not found",
    }
}

/// Store of accounts keyed by identifier and normalised email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account and return it with its assigned identifier.
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account by exact (already normalised) email.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<Account>, AccountRepositoryError>;

    /// Overwrite the mutable fields of an existing account.
    async fn update(&self, account: &Account) -> Result<(), AccountRepositoryError>;
}
