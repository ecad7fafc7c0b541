//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catalog_core::types::id::{ProjectId, TeamId};

/// A client project tracked by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Unique project name.
    pub name: String,
    /// Name of the client the project is delivered for.
    pub client_name: String,
    /// Commercial offer reference.
    pub offer_id: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Owning team, if any.
    pub team_id: Option<TeamId>,
    /// Whether the project is archived.
    pub is_archived: bool,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name.
    pub name: String,
    /// Client name.
    pub client_name: String,
    /// Offer reference.
    pub offer_id: String,
    /// Notes.
    pub notes: Option<String>,
    /// Owning team.
    pub team_id: Option<TeamId>,
}
