//! # catalog-core
//!
//! Core crate for the catalog admin service. Contains configuration schemas,
//! typed identifiers, pagination types, the acting-identity context, the
//! clock abstraction and the unified error system.
//!
//! This crate has **no** internal dependencies on other catalog crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
