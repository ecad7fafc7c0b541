//! Global plugin entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catalog_core::types::id::PluginId;

/// A plugin definition that projects can attach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GlobalPlugin {
    /// Unique plugin identifier.
    pub id: PluginId,
    /// Unique plugin name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Whether the plugin is archived.
    pub is_archived: bool,
    /// When the plugin was created.
    pub created_at: DateTime<Utc>,
    /// When the plugin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new global plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlugin {
    /// Plugin name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
}
