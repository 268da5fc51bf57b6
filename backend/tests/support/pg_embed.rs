//! Embedded PostgreSQL for the Diesel repository suites.
//!
//! One cluster is shared per test binary. Every test gets its own database
//! cloned from a template that already carries the embedded migrations, so
//! suites never see each other's rows.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; the suites then
//! print a skip marker instead of failing.

use std::fmt::Display;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use recipe_backend::domain::ports::AccountRepository;
use recipe_backend::domain::{
    Account, AccountFlags, AccountName, Email, NewAccount, PasswordHash, PlainPassword,
};
use recipe_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, PoolConfig, run_pending_migrations,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_PREFIX: &str = "recipes_template";
const CLUSTER_RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when allowed, otherwise fail loudly so CI notices.
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Render a `postgres` error with its SQLSTATE and detail.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!("postgres error {:?}: {}", db_error.code(), db_error.message());
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= CLUSTER_RETRIES => return Err(error.to_string()),
            Err(_) => {
                std::thread::sleep(RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Template name keyed on the migration contents, so schema edits get a fresh one.
fn template_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

fn ensure_template(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let name = template_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&name);
        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(name)
}

/// A migrated database of its own, a runtime to drive the async
/// repositories, and a pool onto the database.
///
/// Fields drop in order: the pool closes its connections before the
/// runtime stops and the database is removed.
pub struct PgWorld {
    pub pool: DbPool,
    runtime: Runtime,
    database: TemporaryDatabase,
}

impl PgWorld {
    fn start() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = shared_cluster()?;
        let template = ensure_template(cluster, &runtime)?;
        let database = cluster
            .temporary_database_from_template(
                format!("test_{}", Uuid::new_v4().simple()).as_str(),
                template.as_str(),
            )
            .map_err(|err| format!("create database from template: {err:?}"))?;
        let config = PoolConfig::new(database.url())
            .with_max_size(2)
            .with_min_idle(1);
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|err| err.to_string())?;
        Ok(Self {
            pool,
            runtime,
            database,
        })
    }

    pub fn url(&self) -> &str {
        self.database.url()
    }

    /// Drive a repository future to completion. Never call from async code.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Run statements outside the repositories, e.g. to break the schema.
    pub fn execute(&self, sql: &str) {
        let mut client = self.client();
        client
            .batch_execute(sql)
            .unwrap_or_else(|err| panic!("{sql}: {}", format_postgres_error(&err)));
    }

    /// Evaluate a `SELECT count(*)` style query.
    pub fn count(&self, sql: &str) -> i64 {
        let mut client = self.client();
        let row = client
            .query_one(sql, &[])
            .unwrap_or_else(|err| panic!("{sql}: {}", format_postgres_error(&err)));
        row.get(0)
    }

    /// Insert a regular account with a throwaway password.
    pub fn seed_account(&self, email: &str) -> Account {
        let accounts = DieselAccountRepository::new(self.pool.clone());
        let new_account = NewAccount {
            email: Email::normalise(email).expect("valid email"),
            name: AccountName::new("Seeded").expect("valid name"),
            password_hash: PasswordHash::hash(&PlainPassword::new("testpass123"))
                .expect("hashing"),
            flags: AccountFlags::REGULAR,
        };
        self.block_on(accounts.insert(&new_account))
            .expect("seed account")
    }

    fn client(&self) -> Client {
        Client::connect(self.url(), NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)))
    }
}

/// Fixture body shared by the suites; `None` means the cluster was skipped.
pub fn pg_world() -> Option<PgWorld> {
    match PgWorld::start() {
        Ok(world) => Some(world),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
