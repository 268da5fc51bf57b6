//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{
    Account, AccountFlags, AccountId, AccountName, Email, NewAccount, PasswordHash,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AccountRow, AccountUpdate, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

const EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, email: &Email) -> AccountRepositoryError {
    if is_unique_violation(&error, EMAIL_CONSTRAINT) {
        AccountRepositoryError::duplicate_email(email.as_ref())
    } else {
        map_diesel_error(error)
    }
}

/// Convert a database row to a domain account.
fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let invalid = |field: &str| {
        warn!(account_id = row.id, field, "stored account row failed validation");
        AccountRepositoryError::query(format!("stored account has invalid {field}"))
    };
    let email = Email::normalise(&row.email).map_err(|_| invalid("email"))?;
    let name = AccountName::new(row.name.clone()).map_err(|_| invalid("name"))?;
    let password_hash =
        PasswordHash::from_phc(row.password_hash.clone()).map_err(|_| invalid("password_hash"))?;
    Ok(Account::new(
        AccountId::new(row.id),
        email,
        name,
        password_hash,
        AccountFlags {
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        },
    ))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAccountRow {
            email: account.email.as_ref(),
            name: account.name.as_ref(),
            password_hash: account.password_hash.as_str(),
            is_active: account.flags.is_active,
            is_staff: account.flags.is_staff,
            is_superuser: account.flags.is_superuser,
        };

        let stored: AccountRow = diesel::insert_into(accounts::table)
            .values(&row)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &account.email))?;
        row_to_account(stored)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .find(id.get())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn update(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = AccountUpdate {
            email: account.email().as_ref(),
            name: account.name().as_ref(),
            password_hash: account.password_hash().as_str(),
        };

        let updated = diesel::update(accounts::table.find(account.id().get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, account.email()))?;
        if updated == 0 {
            return Err(AccountRepositoryError::not_found(account.id().get()));
        }
        Ok(())
    }
}
