//! User commands.

pub mod password;
pub mod service;

pub use password::PasswordHasher;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
