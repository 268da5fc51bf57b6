//! Shared bb8 pool of `diesel-async` PostgreSQL connections.
//!
//! One [`DbPool`] backs every Diesel repository. Its sizing and checkout
//! timeout come from [`PoolConfig`], which the server fills in from the
//! `RECIPES_POOL_*` settings.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

/// Connections kept open at most when no size is configured.
pub const DEFAULT_MAX_SIZE: u32 = 10;
/// Idle connections kept warm when no minimum is configured.
pub const DEFAULT_MIN_IDLE: u32 = 2;
/// How long a repository waits for a free connection by default.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool failures, surfaced by repositories as connection errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became free before the checkout timeout.
    #[error("no database connection available: {message}")]
    Checkout { message: String },

    /// The pool could not open its initial connections.
    #[error("database pool could not start: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Connection target and sizing for [`DbPool`].
///
/// ```
/// use std::time::Duration;
/// use recipe_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://recipes@localhost/recipes")
///     .with_max_size(4)
///     .with_min_idle(1)
///     .with_checkout_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 4);
/// assert_eq!(config.min_idle(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: DEFAULT_MIN_IDLE,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap on open connections. Zero is raised to one.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// Idle connections to keep open, never more than the cap.
    #[must_use]
    pub fn with_min_idle(mut self, min_idle: u32) -> Self {
        self.min_idle = min_idle;
        self
    }

    #[must_use]
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn min_idle(&self) -> u32 {
        self.min_idle.min(self.max_size)
    }

    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }
}

/// Cloneable handle to the shared connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open its idle connections.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when the URL is unusable or the server refuses
    /// the initial connections.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        debug!(
            max_size = config.max_size(),
            min_idle = config.min_idle(),
            checkout_timeout_ms = config.checkout_timeout().as_millis(),
            "building database pool"
        );
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url());
        let inner = Pool::builder()
            .max_size(config.max_size())
            .min_idle(Some(config.min_idle()))
            .connection_timeout(config.checkout_timeout())
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection, waiting at most the checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
