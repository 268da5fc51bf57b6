//! Driving ports for account management.
//!
//! The HTTP adapter validates payload shapes into domain types and then calls
//! these ports; uniqueness and hashing stay behind them.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, AccountName, Email, Error, PlainPassword};

/// Validated signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub email: Email,
    pub name: AccountName,
    pub password: PlainPassword,
}

/// Partial profile update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub email: Option<Email>,
    pub name: Option<AccountName>,
    pub password: Option<PlainPassword>,
}

/// Commands that create or change accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a regular account through the public signup flow.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_request` error with an `email` field detail when
    /// the address is already registered.
    async fn register(&self, request: SignupRequest) -> Result<Account, Error>;

    /// Apply a profile update to the caller's own account.
    async fn update_profile(
        &self,
        account: AccountId,
        update: ProfileUpdate,
    ) -> Result<Account, Error>;
}

/// Read access to the caller's own account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    async fn profile(&self, account: AccountId) -> Result<Account, Error>;
}
