//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catalog_core::types::id::{LogId, PluginId, ProjectId, TeamId, UserId};

use super::kind::{EntityKind, EventKind};

/// One property-level before/after pair.
///
/// Both values are already rendered to their canonical text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FieldChange {
    /// Tracked property name (e.g. `"ClientName"`).
    pub property: String,
    /// Value before the change; empty for creations.
    pub old_value: String,
    /// Value after the change; empty for removals.
    pub new_value: String,
}

impl FieldChange {
    /// Creates a field change.
    pub fn new(
        property: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    /// The same change seen in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self::new(&self.property, &self.new_value, &self.old_value)
    }
}

/// A nullable reference to an audited record plus its name at write time.
///
/// The id is cleared when the record is deleted; the name never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef<I> {
    /// The record's id while it still exists.
    pub id: Option<I>,
    /// The record's name when the entry was written.
    pub name: String,
}

impl<I> SubjectRef<I> {
    /// Reference to an existing record.
    pub fn new(id: I, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}

/// The single record a log entry is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogSubject {
    /// A project (also used for its plugin attachments).
    Project(SubjectRef<ProjectId>),
    /// A team.
    Team(SubjectRef<TeamId>),
    /// A global plugin.
    Plugin(SubjectRef<PluginId>),
    /// The user affected by the change.
    User(SubjectRef<UserId>),
}

impl LogSubject {
    /// Subject reference for a project.
    pub fn project(id: ProjectId, name: impl Into<String>) -> Self {
        Self::Project(SubjectRef::new(id, name))
    }

    /// Subject reference for a team.
    pub fn team(id: TeamId, name: impl Into<String>) -> Self {
        Self::Team(SubjectRef::new(id, name))
    }

    /// Subject reference for a global plugin.
    pub fn plugin(id: PluginId, name: impl Into<String>) -> Self {
        Self::Plugin(SubjectRef::new(id, name))
    }

    /// Subject reference for a user.
    pub fn user(id: UserId, name: impl Into<String>) -> Self {
        Self::User(SubjectRef::new(id, name))
    }

    /// The denormalized subject name.
    pub fn name(&self) -> &str {
        match self {
            Self::Project(r) => &r.name,
            Self::Team(r) => &r.name,
            Self::Plugin(r) => &r.name,
            Self::User(r) => &r.name,
        }
    }

    /// Whether the subject can be the target of events of `kind`.
    pub fn accepts(&self, kind: EventKind) -> bool {
        matches!(
            (self, kind.entity()),
            (Self::Project(_), EntityKind::Project | EntityKind::ProjectPlugin)
                | (Self::Team(_), EntityKind::Team)
                | (Self::Plugin(_), EntityKind::GlobalPlugin)
                | (Self::User(_), EntityKind::User)
        )
    }

    /// Clear the foreign key, keeping the name snapshot.
    pub fn detach(&mut self) {
        match self {
            Self::Project(r) => r.id = None,
            Self::Team(r) => r.id = None,
            Self::Plugin(r) => r.id = None,
            Self::User(r) => r.id = None,
        }
    }
}

/// An immutable audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Surrogate identifier assigned on persist.
    pub id: LogId,
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
    /// The acting user, while that user still exists.
    pub actor_id: Option<UserId>,
    /// The acting user's display value at write time.
    pub actor_display: String,
    /// The record the entry is about.
    pub subject: LogSubject,
    /// Semantic event tag.
    pub event_kind: EventKind,
    /// Ordered field-level changes.
    pub changes: Vec<FieldChange>,
}

/// Data required to append a new log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLogEntry {
    /// Append time.
    pub timestamp: DateTime<Utc>,
    /// Acting user id.
    pub actor_id: Option<UserId>,
    /// Acting user display snapshot.
    pub actor_display: String,
    /// Subject reference.
    pub subject: LogSubject,
    /// Event tag.
    pub event_kind: EventKind,
    /// Ordered field-level changes.
    pub changes: Vec<FieldChange>,
}

impl NewLogEntry {
    /// Attach the identity assigned by the store.
    pub fn into_entry(self, id: LogId) -> LogEntry {
        LogEntry {
            id,
            timestamp: self.timestamp,
            actor_id: self.actor_id,
            actor_display: self.actor_display,
            subject: self.subject,
            event_kind: self.event_kind,
            changes: self.changes,
        }
    }
}
