//! # catalog-database
//!
//! Persistence for the catalog. Services talk to a [`CatalogStore`] and do
//! all of their reads and writes through one [`CatalogTransaction`] per
//! command, so a mutation and its audit entries commit or roll back
//! together.
//!
//! Two stores are provided: [`PgCatalogStore`] over a sqlx PostgreSQL pool
//! and [`MemoryCatalogStore`] for tests and single-process demos.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::memory::MemoryCatalogStore;
pub use store::postgres::PgCatalogStore;
pub use store::{CatalogStore, CatalogTransaction, LogFilter};
