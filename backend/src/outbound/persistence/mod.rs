//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Ownership scoping is expressed in the `WHERE` clauses.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures map onto each port's
//!   error enum; unique violations become the port's duplicate variants.
//!
//! # Example
//!
//! ```ignore
//! use recipe_backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_recipe_repository;
mod diesel_tag_repository;
mod diesel_token_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use diesel_token_repository::DieselTokenRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DbPool, PoolConfig, PoolError,
};
