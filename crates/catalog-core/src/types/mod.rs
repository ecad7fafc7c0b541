//! Core type definitions used across the catalog workspace.

pub mod actor;
pub mod id;
pub mod pagination;

pub use actor::ActorContext;
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
