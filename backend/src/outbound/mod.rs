//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local store used for local runs and tests
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
