//! Server settings loaded via OrthoConfig and the resolved server config.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use recipe_backend::outbound::persistence::{DbPool, PoolConfig};
use serde::Deserialize;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings layered from CLI flags, `RECIPES_*` variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections the pool keeps open.
    pub pool_min_idle: Option<u32>,
    /// Seconds a request waits for a free connection before failing with 503.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Emit JSON log lines instead of the human-readable format.
    #[ortho_config(default = true)]
    pub log_json: bool,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Pool configuration when a database URL is present.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let mut config = PoolConfig::new(url);
        if let Some(max_size) = self.pool_max_size {
            config = config.with_max_size(max_size);
        }
        if let Some(min_idle) = self.pool_min_idle {
            config = config.with_min_idle(min_idle);
        }
        if let Some(secs) = self.pool_connection_timeout_secs {
            config = config.with_checkout_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Serve from PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use recipe_backend::outbound::persistence::{DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE};
    use rstest::rstest;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("recipe-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_serve_from_memory() {
        let _guard = lock_env([
            ("RECIPES_BIND_ADDR", None::<String>),
            ("RECIPES_DATABASE_URL", None::<String>),
            ("RECIPES_POOL_MAX_SIZE", None::<String>),
            ("RECIPES_POOL_MIN_IDLE", None::<String>),
            ("RECIPES_POOL_CONNECTION_TIMEOUT_SECS", None::<String>),
            ("RECIPES_LOG_JSON", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.pool_config().is_none());
        assert!(settings.log_json);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("RECIPES_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "RECIPES_DATABASE_URL",
                Some("postgres://recipes@localhost/recipes".to_owned()),
            ),
            ("RECIPES_POOL_MAX_SIZE", Some("4".to_owned())),
            ("RECIPES_POOL_MIN_IDLE", Some("1".to_owned())),
            ("RECIPES_POOL_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
            ("RECIPES_LOG_JSON", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("configured address").port(),
            9000
        );
        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://recipes@localhost/recipes");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.min_idle(), 1);
        assert_eq!(pool.checkout_timeout(), Duration::from_secs(5));
        assert!(!settings.log_json);
    }

    #[rstest]
    fn pool_settings_fall_back_to_defaults_per_field() {
        let _guard = lock_env([
            (
                "RECIPES_DATABASE_URL",
                Some("postgres://recipes@localhost/recipes".to_owned()),
            ),
            ("RECIPES_POOL_MAX_SIZE", None::<String>),
            ("RECIPES_POOL_MIN_IDLE", None::<String>),
            ("RECIPES_POOL_CONNECTION_TIMEOUT_SECS", Some("2".to_owned())),
        ]);

        let pool = load_from_empty_args()
            .pool_config()
            .expect("database configured");
        assert_eq!(pool.max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(pool.min_idle(), DEFAULT_MIN_IDLE);
        assert_eq!(pool.checkout_timeout(), Duration::from_secs(2));
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("RECIPES_BIND_ADDR", Some("not-an-address".to_owned()))]);
        assert!(load_from_empty_args().bind_addr().is_err());
    }
}
