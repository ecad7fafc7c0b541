//! Event kind and audited entity kind enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of catalog records whose changes are audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A project.
    Project,
    /// A plugin attached to a project.
    ProjectPlugin,
    /// A team.
    Team,
    /// A global plugin definition.
    GlobalPlugin,
    /// A user.
    User,
}

impl EntityKind {
    /// Event emitted when a record of this kind is created.
    pub fn added(self) -> EventKind {
        match self {
            Self::Project => EventKind::AddedProject,
            Self::ProjectPlugin => EventKind::AddedProjectPlugin,
            Self::Team => EventKind::AddedTeam,
            Self::GlobalPlugin => EventKind::AddedGlobalPlugin,
            Self::User => EventKind::AddedUser,
        }
    }

    /// Event emitted when a record of this kind is edited.
    pub fn updated(self) -> EventKind {
        match self {
            Self::Project => EventKind::UpdatedProject,
            Self::ProjectPlugin => EventKind::UpdatedProjectPlugin,
            Self::Team => EventKind::UpdatedTeam,
            Self::GlobalPlugin => EventKind::UpdatedGlobalPlugin,
            Self::User => EventKind::UpdatedUser,
        }
    }

    /// Event emitted when a record of this kind is deleted.
    pub fn removed(self) -> EventKind {
        match self {
            Self::Project => EventKind::RemovedProject,
            Self::ProjectPlugin => EventKind::RemovedProjectPlugin,
            Self::Team => EventKind::RemovedTeam,
            Self::GlobalPlugin => EventKind::RemovedGlobalPlugin,
            Self::User => EventKind::RemovedUser,
        }
    }

    /// Event emitted when the archive flag is raised, for kinds that have one.
    pub fn archived(self) -> Option<EventKind> {
        match self {
            Self::Project => Some(EventKind::ArchivedProject),
            Self::GlobalPlugin => Some(EventKind::ArchivedGlobalPlugin),
            _ => None,
        }
    }

    /// Event emitted when the archive flag is cleared, for kinds that have one.
    pub fn unarchived(self) -> Option<EventKind> {
        match self {
            Self::Project => Some(EventKind::UnarchivedProject),
            Self::GlobalPlugin => Some(EventKind::UnarchivedGlobalPlugin),
            _ => None,
        }
    }

    /// Lowercase label used in rendered messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::ProjectPlugin => "project plugin",
            Self::Team => "team",
            Self::GlobalPlugin => "plugin",
            Self::User => "user",
        }
    }
}

/// Semantic family of an event, independent of the entity it concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFamily {
    /// Creation.
    Added,
    /// Generic edit.
    Updated,
    /// Archive flag raised.
    Archived,
    /// Archive flag cleared.
    Unarchived,
    /// Deletion.
    Removed,
}

/// Closed set of audit event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "log_event_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A project was created.
    AddedProject,
    /// A project was edited.
    UpdatedProject,
    /// A project was archived.
    ArchivedProject,
    /// A project was unarchived.
    UnarchivedProject,
    /// A project was deleted.
    RemovedProject,
    /// A plugin was attached to a project.
    AddedProjectPlugin,
    /// A project's plugin attachment was edited.
    UpdatedProjectPlugin,
    /// A plugin was detached from a project.
    RemovedProjectPlugin,
    /// A team was created.
    AddedTeam,
    /// A team was edited.
    UpdatedTeam,
    /// A team was deleted.
    RemovedTeam,
    /// A user was created.
    AddedUser,
    /// A user was edited.
    UpdatedUser,
    /// A user was deleted.
    RemovedUser,
    /// A global plugin was created.
    AddedGlobalPlugin,
    /// A global plugin was edited.
    UpdatedGlobalPlugin,
    /// A global plugin was archived.
    ArchivedGlobalPlugin,
    /// A global plugin was unarchived.
    UnarchivedGlobalPlugin,
    /// A global plugin was deleted.
    RemovedGlobalPlugin,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [EventKind; 19] = [
        Self::AddedProject,
        Self::UpdatedProject,
        Self::ArchivedProject,
        Self::UnarchivedProject,
        Self::RemovedProject,
        Self::AddedProjectPlugin,
        Self::UpdatedProjectPlugin,
        Self::RemovedProjectPlugin,
        Self::AddedTeam,
        Self::UpdatedTeam,
        Self::RemovedTeam,
        Self::AddedUser,
        Self::UpdatedUser,
        Self::RemovedUser,
        Self::AddedGlobalPlugin,
        Self::UpdatedGlobalPlugin,
        Self::ArchivedGlobalPlugin,
        Self::UnarchivedGlobalPlugin,
        Self::RemovedGlobalPlugin,
    ];

    /// The entity kind the event concerns.
    pub fn entity(self) -> EntityKind {
        match self {
            Self::AddedProject
            | Self::UpdatedProject
            | Self::ArchivedProject
            | Self::UnarchivedProject
            | Self::RemovedProject => EntityKind::Project,
            Self::AddedProjectPlugin | Self::UpdatedProjectPlugin | Self::RemovedProjectPlugin => {
                EntityKind::ProjectPlugin
            }
            Self::AddedTeam | Self::UpdatedTeam | Self::RemovedTeam => EntityKind::Team,
            Self::AddedUser | Self::UpdatedUser | Self::RemovedUser => EntityKind::User,
            Self::AddedGlobalPlugin
            | Self::UpdatedGlobalPlugin
            | Self::ArchivedGlobalPlugin
            | Self::UnarchivedGlobalPlugin
            | Self::RemovedGlobalPlugin => EntityKind::GlobalPlugin,
        }
    }

    /// The semantic family of the event.
    pub fn family(self) -> EventFamily {
        match self {
            Self::AddedProject
            | Self::AddedProjectPlugin
            | Self::AddedTeam
            | Self::AddedUser
            | Self::AddedGlobalPlugin => EventFamily::Added,
            Self::UpdatedProject
            | Self::UpdatedProjectPlugin
            | Self::UpdatedTeam
            | Self::UpdatedUser
            | Self::UpdatedGlobalPlugin => EventFamily::Updated,
            Self::ArchivedProject | Self::ArchivedGlobalPlugin => EventFamily::Archived,
            Self::UnarchivedProject | Self::UnarchivedGlobalPlugin => EventFamily::Unarchived,
            Self::RemovedProject
            | Self::RemovedProjectPlugin
            | Self::RemovedTeam
            | Self::RemovedUser
            | Self::RemovedGlobalPlugin => EventFamily::Removed,
        }
    }

    /// Whether entries of this kind carry a full snapshot rather than a diff.
    pub fn is_snapshot(self) -> bool {
        matches!(self.family(), EventFamily::Added | EventFamily::Removed)
    }

    /// Return the kind as its stored snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddedProject => "added_project",
            Self::UpdatedProject => "updated_project",
            Self::ArchivedProject => "archived_project",
            Self::UnarchivedProject => "unarchived_project",
            Self::RemovedProject => "removed_project",
            Self::AddedProjectPlugin => "added_project_plugin",
            Self::UpdatedProjectPlugin => "updated_project_plugin",
            Self::RemovedProjectPlugin => "removed_project_plugin",
            Self::AddedTeam => "added_team",
            Self::UpdatedTeam => "updated_team",
            Self::RemovedTeam => "removed_team",
            Self::AddedUser => "added_user",
            Self::UpdatedUser => "updated_user",
            Self::RemovedUser => "removed_user",
            Self::AddedGlobalPlugin => "added_global_plugin",
            Self::UpdatedGlobalPlugin => "updated_global_plugin",
            Self::ArchivedGlobalPlugin => "archived_global_plugin",
            Self::UnarchivedGlobalPlugin => "unarchived_global_plugin",
            Self::RemovedGlobalPlugin => "removed_global_plugin",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = catalog_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| catalog_core::AppError::validation(format!("Invalid event kind: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_round_trips_through_its_tag() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_from_str_accepts_dashes() {
        assert_eq!(
            "updated-project-plugin".parse::<EventKind>().unwrap(),
            EventKind::UpdatedProjectPlugin
        );
        assert!("renamed_project".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_entity_kind_mapping_is_consistent() {
        for kind in EventKind::ALL {
            let entity = kind.entity();
            let expected = match kind.family() {
                EventFamily::Added => Some(entity.added()),
                EventFamily::Updated => Some(entity.updated()),
                EventFamily::Removed => Some(entity.removed()),
                EventFamily::Archived => entity.archived(),
                EventFamily::Unarchived => entity.unarchived(),
            };
            assert_eq!(expected, Some(kind));
        }
    }

    #[test]
    fn test_only_projects_and_plugins_archive() {
        assert!(EntityKind::Team.archived().is_none());
        assert!(EntityKind::User.unarchived().is_none());
        assert!(EntityKind::ProjectPlugin.archived().is_none());
    }
}
