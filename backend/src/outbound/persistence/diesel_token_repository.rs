//! PostgreSQL-backed `TokenRepository` implementation using Diesel ORM.
//!
//! Each account owns at most one row in `auth_tokens`; issuing a token
//! upserts that row so the previous digest stops resolving.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TokenRepository, TokenRepositoryError};
use crate::domain::{AccountId, TokenDigest};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the `TokenRepository` port.
#[derive(Clone)]
pub struct DieselTokenRepository {
    pool: DbPool,
}

impl DieselTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenRepositoryError {
    map_basic_pool_error(error, TokenRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TokenRepositoryError {
    map_basic_diesel_error(
        error,
        TokenRepositoryError::query,
        TokenRepositoryError::connection,
    )
}

#[async_trait]
impl TokenRepository for DieselTokenRepository {
    async fn replace(
        &self,
        account: AccountId,
        digest: &TokenDigest,
    ) -> Result<(), TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTokenRow {
            account_id: account.get(),
            digest: digest.as_str(),
        };

        diesel::insert_into(auth_tokens::table)
            .values(&row)
            .on_conflict(auth_tokens::account_id)
            .do_update()
            .set((
                auth_tokens::digest.eq(excluded(auth_tokens::digest)),
                auth_tokens::created_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn resolve(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<AccountId>, TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let account_id: Option<i64> = auth_tokens::table
            .filter(auth_tokens::digest.eq(digest.as_str()))
            .select(auth_tokens::account_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(account_id.map(AccountId::new))
    }
}
