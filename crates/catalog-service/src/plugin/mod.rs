//! Global plugin commands.

pub mod service;

pub use service::{CreatePluginRequest, PluginService, UpdatePluginRequest};
