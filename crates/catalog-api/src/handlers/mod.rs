//! Request handlers, one module per resource.

pub mod health;
pub mod log;
pub mod plugin;
pub mod project;
pub mod team;
pub mod user;
