//! SQL for each catalog table.
//!
//! Every function runs on a borrowed connection so callers decide the
//! transaction boundary.

pub mod log;
pub mod plugin;
pub mod project;
pub mod project_plugin;
pub mod team;
pub mod user;

pub use log::LogRepository;
pub use plugin::PluginRepository;
pub use project::ProjectRepository;
pub use project_plugin::ProjectPluginRepository;
pub use team::TeamRepository;
pub use user::UserRepository;

use catalog_core::error::{AppError, ErrorKind};

/// Map a write failure, turning unique-index violations into conflicts.
pub(crate) fn write_error(context: &'static str, err: sqlx::Error) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        AppError::with_source(ErrorKind::Conflict, format!("{context}: already exists"), err)
    } else {
        AppError::with_source(ErrorKind::Database, context, err)
    }
}
