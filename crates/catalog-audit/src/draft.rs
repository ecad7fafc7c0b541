//! Log entries under construction, before they are stamped and persisted.

use chrono::{DateTime, Utc};

use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::actor::ActorContext;
use catalog_entity::log::{EventKind, FieldChange, LogSubject, NewLogEntry};

use crate::changeset::{creation_snapshot, removal_snapshot};
use crate::tracked::Audited;

/// An entry the service has decided to write.
///
/// Carries everything except the timestamp and actor, which the ledger adds
/// at append time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDraft {
    /// Subject the entry is about.
    pub subject: LogSubject,
    /// Event tag.
    pub event_kind: EventKind,
    /// Ordered field changes.
    pub changes: Vec<FieldChange>,
}

impl LogDraft {
    /// Creation entry carrying a full snapshot of `record`.
    pub fn created<T: Audited>(subject: LogSubject, record: &T) -> Self {
        Self {
            subject,
            event_kind: T::KIND.added(),
            changes: creation_snapshot(record),
        }
    }

    /// Removal entry carrying a full snapshot of `record` as it was.
    pub fn removed<T: Audited>(subject: LogSubject, record: &T) -> Self {
        Self {
            subject,
            event_kind: T::KIND.removed(),
            changes: removal_snapshot(record),
        }
    }

    /// Entry for an edit already diffed and classified.
    ///
    /// Fails if the diff is empty or the subject cannot carry `event_kind`.
    pub fn updated(
        subject: LogSubject,
        event_kind: EventKind,
        changes: Vec<FieldChange>,
    ) -> AppResult<Self> {
        if !subject.accepts(event_kind) {
            return Err(AppError::internal(format!(
                "Event {event_kind} cannot be recorded against {}",
                subject.name()
            )));
        }
        if changes.is_empty() && !event_kind.is_snapshot() {
            return Err(AppError::internal(format!(
                "Refusing to record {event_kind} without any changes"
            )));
        }
        Ok(Self {
            subject,
            event_kind,
            changes,
        })
    }

    /// Stamp the draft with its actor and time.
    pub fn into_new_entry(self, actor: &ActorContext, timestamp: DateTime<Utc>) -> NewLogEntry {
        NewLogEntry {
            timestamp,
            actor_id: actor.current_actor_id(),
            actor_display: actor.current_actor_display().to_string(),
            subject: self.subject,
            event_kind: self.event_kind,
            changes: self.changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracked::AttachmentSnapshot;
    use catalog_core::types::id::{ProjectId, TeamId, UserId};
    use catalog_entity::team::Team;
    use chrono::TimeZone;

    fn team() -> Team {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Team {
            id: TeamId(2),
            name: "Core".into(),
            description: Some("Core services".into()),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_created_snapshot() {
        let draft = LogDraft::created(LogSubject::team(TeamId(2), "Core"), &team());
        assert_eq!(draft.event_kind, EventKind::AddedTeam);
        assert_eq!(
            draft.changes,
            vec![
                FieldChange::new("TeamName", "", "Core"),
                FieldChange::new("Description", "", "Core services"),
            ]
        );
    }

    #[test]
    fn test_attachment_snapshot_uses_project_subject() {
        let snapshot = AttachmentSnapshot {
            plugin: "Jira".into(),
            url: "https://jira".into(),
            display_name: "Tracker".into(),
        };
        let draft = LogDraft::removed(LogSubject::project(ProjectId(1), "Apollo"), &snapshot);
        assert_eq!(draft.event_kind, EventKind::RemovedProjectPlugin);
        assert_eq!(draft.changes[0], FieldChange::new("Plugin", "Jira", ""));
    }

    #[test]
    fn test_updated_rejects_empty_diff() {
        let result = LogDraft::updated(
            LogSubject::team(TeamId(2), "Core"),
            EventKind::UpdatedTeam,
            Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_updated_rejects_mismatched_subject() {
        let result = LogDraft::updated(
            LogSubject::team(TeamId(2), "Core"),
            EventKind::UpdatedProject,
            vec![FieldChange::new("ProjectName", "a", "b")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_stamping_copies_actor() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let actor = ActorContext::new(Some(UserId(9)), "admin@example.com");
        let entry = LogDraft::created(LogSubject::team(TeamId(2), "Core"), &team())
            .into_new_entry(&actor, at);
        assert_eq!(entry.actor_id, Some(UserId(9)));
        assert_eq!(entry.actor_display, "admin@example.com");
        assert_eq!(entry.timestamp, at);
    }
}
