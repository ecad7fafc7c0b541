//! Global plugin domain entities.

pub mod model;

pub use model::{CreatePlugin, GlobalPlugin};
