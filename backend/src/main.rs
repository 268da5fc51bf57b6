//! Backend entry-point: loads settings, prepares the store and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::outbound::persistence::{DbPool, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

fn init_tracing(json: bool) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings =
        ServerSettings::load().map_err(|err| io::Error::other(format!("load settings: {err}")))?;
    init_tracing(settings.log_json);

    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io::Error::other(format!("invalid bind address: {err}")))?;
    let mut config = ServerConfig::new(bind_addr);

    if let Some(pool_config) = settings.pool_config() {
        run_pending_migrations(pool_config.database_url())
            .await
            .map_err(io::Error::other)?;
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|err| io::Error::other(format!("create database pool: {err}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "serving recipe API");
    server.await
}
