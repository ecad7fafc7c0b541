//! # catalog-service
//!
//! Command handlers for the catalog's aggregates plus the audit ledger
//! they write through.
//!
//! Every command takes the acting [`ActorContext`](catalog_core::types::actor::ActorContext)
//! explicitly, runs inside one store transaction and appends its log
//! entries before committing: a command either lands together with its
//! history or not at all.

pub mod audit;
pub mod plugin;
pub mod project;
pub mod team;
pub mod user;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use audit::{AuditLedger, LogQuery, LogService, RenderedLogEntry};
pub use plugin::{CreatePluginRequest, PluginService, UpdatePluginRequest};
pub use project::{CreateProjectRequest, ProjectDetails, ProjectService, UpdateProjectRequest};
pub use team::{CreateTeamRequest, TeamService, UpdateTeamRequest};
pub use user::{CreateUserRequest, PasswordHasher, UpdateUserRequest, UserService};
