//! Audit log entities.

pub mod kind;
pub mod model;

pub use kind::{EntityKind, EventFamily, EventKind};
pub use model::{FieldChange, LogEntry, LogSubject, NewLogEntry, SubjectRef};
