//! Project domain entities.

pub mod attachment;
pub mod model;

pub use attachment::{AttachmentInput, CreateProjectPlugin, ProjectPlugin};
pub use model::{CreateProject, Project};
