//! Create an administrative account with the staff and superuser flags set.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::domain::{AccountService, PlainPassword};
use recipe_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, PoolConfig, run_pending_migrations,
};

const DATABASE_URL_ENV: &str = "RECIPES_DATABASE_URL";

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create a staff account with every permission",
    version
)]
struct CliArgs {
    /// Login email; normalised the same way as sign-up.
    #[arg(long, value_name = "email")]
    email: String,
    /// Initial password. Not subject to the sign-up length rule.
    #[arg(long, value_name = "password")]
    password: String,
    /// Database connection URL. Falls back to `RECIPES_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
    let args = CliArgs::parse();
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;

    run_pending_migrations(&database_url)
        .await
        .wrap_err("apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;

    let service = AccountService::new(Arc::new(DieselAccountRepository::new(pool)));
    let account = service
        .create_superuser(&args.email, &PlainPassword::new(args.password))
        .await
        .map_err(|err| eyre!("create superuser: {err}"))?;

    info!(account_id = %account.id(), "superuser created");
    println!("created superuser {}", account.email());
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    let url = explicit
        .or(from_env)
        .ok_or_else(|| eyre!("database URL missing: set --database-url or {DATABASE_URL_ENV}"))?;
    if url.trim().is_empty() {
        return Err(eyre!("database URL must not be empty"));
    }
    Ok(url)
}
