//! Project commands, including edits to a project's plugin attachments.

mod attachments;
pub mod service;

pub use service::{CreateProjectRequest, ProjectDetails, ProjectService, UpdateProjectRequest};
