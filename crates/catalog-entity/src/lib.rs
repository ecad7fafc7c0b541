//! # catalog-entity
//!
//! Domain entity models for the catalog. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod log;
pub mod plugin;
pub mod project;
pub mod team;
pub mod user;
