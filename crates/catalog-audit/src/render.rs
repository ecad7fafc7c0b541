//! Human-readable rendering of log entries.
//!
//! Rendering is pure and deterministic: the same entry always yields the
//! same line, and the line only uses values captured in the entry itself.

use catalog_core::types::actor::SYSTEM_ACTOR;
use catalog_entity::log::{EntityKind, EventFamily, EventKind, FieldChange, LogEntry};

/// Render a persisted entry.
pub fn render(entry: &LogEntry) -> String {
    render_message(
        entry.event_kind,
        &entry.actor_display,
        entry.subject.name(),
        &entry.changes,
    )
}

/// Render the message for an event from its parts.
pub fn render_message(
    kind: EventKind,
    actor_display: &str,
    subject_name: &str,
    changes: &[FieldChange],
) -> String {
    let actor = if actor_display.trim().is_empty() {
        SYSTEM_ACTOR
    } else {
        actor_display
    };
    let entity = kind.entity();

    if entity == EntityKind::ProjectPlugin {
        return match kind.family() {
            EventFamily::Added => format!(
                "{actor} added a new plugin to project {subject_name} with properties: {}",
                properties(changes, |c| &c.new_value)
            ),
            EventFamily::Removed => format!(
                "{actor} removed a plugin from project {subject_name} with properties: {}",
                properties(changes, |c| &c.old_value)
            ),
            _ => format!(
                "{actor} updated a plugin of project {subject_name}: {}",
                clauses(changes)
            ),
        };
    }

    let label = entity.label();
    match kind.family() {
        EventFamily::Added => format!(
            "{actor} added a new {label} with properties: {}",
            properties(changes, |c| &c.new_value)
        ),
        EventFamily::Updated => {
            format!("{actor} updated {label} {subject_name}: {}", clauses(changes))
        }
        EventFamily::Archived => format!("{actor} archived {label} {subject_name}"),
        EventFamily::Unarchived => format!("{actor} unarchived {label} {subject_name}"),
        EventFamily::Removed => format!("{actor} removed {label} {subject_name}"),
    }
}

fn properties(changes: &[FieldChange], value: impl Fn(&FieldChange) -> &String) -> String {
    changes
        .iter()
        .map(|change| format!("{} = {}", change.property, value(change)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn clauses(changes: &[FieldChange]) -> String {
    changes.iter().map(clause).collect::<Vec<_>>().join(", ")
}

fn clause(change: &FieldChange) -> String {
    let FieldChange {
        property,
        old_value,
        new_value,
    } = change;
    match (old_value.is_empty(), new_value.is_empty()) {
        (true, true) => format!("changed {property}"),
        (true, false) => format!("set {property} to {new_value}"),
        (false, true) => format!("cleared {property} (was {old_value})"),
        (false, false) => format!("set {property} from {old_value} to {new_value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::types::id::{LogId, ProjectId};
    use catalog_entity::log::LogSubject;
    use chrono::Utc;

    fn entry(kind: EventKind, actor: &str, changes: Vec<FieldChange>) -> LogEntry {
        LogEntry {
            id: LogId(1),
            timestamp: Utc::now(),
            actor_id: None,
            actor_display: actor.into(),
            subject: LogSubject::project(ProjectId(1), "Apollo"),
            event_kind: kind,
            changes,
        }
    }

    #[test]
    fn test_updated_project_message() {
        let e = entry(
            EventKind::UpdatedProject,
            "admin@example.com",
            vec![
                FieldChange::new("ClientName", "Old Client", "New Client"),
                FieldChange::new("OfferId", "Offer A", "Updated Offer"),
            ],
        );
        assert_eq!(
            render(&e),
            "admin@example.com updated project Apollo: set ClientName from Old Client to New Client, set OfferId from Offer A to Updated Offer"
        );
    }

    #[test]
    fn test_clause_variants() {
        let e = entry(
            EventKind::UpdatedProject,
            "a@b.c",
            vec![
                FieldChange::new("Notes", "", "hello"),
                FieldChange::new("OfferId", "X", ""),
            ],
        );
        assert_eq!(
            render(&e),
            "a@b.c updated project Apollo: set Notes to hello, cleared OfferId (was X)"
        );

        let masked = render_message(
            EventKind::UpdatedUser,
            "a@b.c",
            "ada@example.com",
            &[FieldChange::new("Password", "", "")],
        );
        assert_eq!(masked, "a@b.c updated user ada@example.com: changed Password");
    }

    #[test]
    fn test_blank_actor_is_system() {
        let e = entry(EventKind::ArchivedProject, "  ", vec![FieldChange::new("IsArchived", "False", "True")]);
        assert_eq!(render(&e), "System archived project Apollo");
    }

    #[test]
    fn test_added_project_lists_new_values() {
        let e = entry(
            EventKind::AddedProject,
            "a@b.c",
            vec![
                FieldChange::new("ProjectName", "", "Apollo"),
                FieldChange::new("IsArchived", "", "False"),
            ],
        );
        assert_eq!(
            render(&e),
            "a@b.c added a new project with properties: ProjectName = Apollo, IsArchived = False"
        );
    }

    #[test]
    fn test_attachment_messages() {
        let removed = entry(
            EventKind::RemovedProjectPlugin,
            "a@b.c",
            vec![
                FieldChange::new("Plugin", "Jira", ""),
                FieldChange::new("Url", "https://jira", ""),
                FieldChange::new("DisplayName", "Tracker", ""),
            ],
        );
        assert_eq!(
            render(&removed),
            "a@b.c removed a plugin from project Apollo with properties: Plugin = Jira, Url = https://jira, DisplayName = Tracker"
        );

        let updated = entry(
            EventKind::UpdatedProjectPlugin,
            "a@b.c",
            vec![FieldChange::new("DisplayName", "X", "Y")],
        );
        assert_eq!(
            render(&updated),
            "a@b.c updated a plugin of project Apollo: set DisplayName from X to Y"
        );
    }

    #[test]
    fn test_global_plugin_label() {
        let message = render_message(EventKind::RemovedGlobalPlugin, "a@b.c", "Jira", &[]);
        assert_eq!(message, "a@b.c removed plugin Jira");
    }
}
