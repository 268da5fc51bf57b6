//! Embedded schema migrations.
//!
//! The SQL under `backend/migrations` is compiled into the binary. Migrations
//! run over a blocking wrapper around the async connection on a
//! `spawn_blocking` thread before the pool starts serving requests.

use diesel::Connection as _;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness as _, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    #[error("migration task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Apply every pending migration, returning how many ran.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || -> Result<usize, MigrationError> {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url)?;
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        Ok(versions.len())
    })
    .await??;
    info!(applied, "database migrations complete");
    Ok(applied)
}
