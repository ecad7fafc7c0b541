//! A project's attachment to a global plugin.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catalog_core::types::id::{PluginId, ProjectId, ProjectPluginId};

/// A global plugin attached to a project, with its own URL and label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectPlugin {
    /// Unique attachment identifier.
    pub id: ProjectPluginId,
    /// The owning project.
    pub project_id: ProjectId,
    /// The referenced global plugin.
    pub plugin_id: PluginId,
    /// Project-specific URL of the plugin.
    pub url: String,
    /// Project-specific display label.
    pub display_name: String,
}

impl ProjectPlugin {
    /// Identity of the attachment within its project.
    ///
    /// Changing either half is a different attachment; changing only the
    /// display label is an edit of the same one.
    pub fn key(&self) -> (PluginId, String) {
        (self.plugin_id, self.url.clone())
    }
}

/// Data required to attach a plugin to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectPlugin {
    /// The owning project.
    pub project_id: ProjectId,
    /// The referenced global plugin.
    pub plugin_id: PluginId,
    /// Project-specific URL.
    pub url: String,
    /// Project-specific display label.
    pub display_name: String,
}

/// One entry of a proposed attachment list, as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInput {
    /// The referenced global plugin.
    pub plugin_id: PluginId,
    /// Project-specific URL.
    pub url: String,
    /// Project-specific display label.
    pub display_name: String,
}

impl AttachmentInput {
    /// Materialize the input as an attachment of `project_id`.
    ///
    /// The id is a placeholder until the row is persisted.
    pub fn into_attachment(self, project_id: ProjectId) -> ProjectPlugin {
        ProjectPlugin {
            id: ProjectPluginId(0),
            project_id,
            plugin_id: self.plugin_id,
            url: self.url,
            display_name: self.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_display_name() {
        let a = AttachmentInput {
            plugin_id: PluginId(1),
            url: "https://u1".into(),
            display_name: "X".into(),
        }
        .into_attachment(ProjectId(7));
        let mut b = a.clone();
        b.display_name = "Y".into();
        assert_eq!(a.key(), b.key());

        b.url = "https://u2".into();
        assert_ne!(a.key(), b.key());
    }
}
