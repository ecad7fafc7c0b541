//! Team entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catalog_core::types::id::TeamId;

/// A team owning projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Team {
    /// Unique team identifier.
    pub id: TeamId,
    /// Unique team name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the team was created.
    pub created_at: DateTime<Utc>,
    /// When the team was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Team name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
}
