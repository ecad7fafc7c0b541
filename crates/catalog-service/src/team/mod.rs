//! Team commands.

pub mod service;

pub use service::{CreateTeamRequest, TeamService, UpdateTeamRequest};
