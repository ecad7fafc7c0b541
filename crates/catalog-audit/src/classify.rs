//! Event classification for scalar diffs.

use catalog_entity::log::{EntityKind, EventKind, FieldChange};

use crate::changeset::build_scalar_diff;
use crate::tracked::Audited;

const FLAG_OFF: &str = "False";
const FLAG_ON: &str = "True";

/// Direction of an archive flag flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagTransition {
    /// `False` to `True`.
    Raised,
    /// `True` to `False`.
    Cleared,
}

/// Coarse shape of a diff, as far as classification cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeShape {
    /// Nothing changed.
    Empty,
    /// The archive flag is the only change.
    FlagOnly(FlagTransition),
    /// Anything else.
    General,
}

impl ChangeShape {
    /// Inspect `changes` against the entity's archive flag, if it has one.
    pub fn of(changes: &[FieldChange], archive_flag: Option<&str>) -> Self {
        match (changes, archive_flag) {
            ([], _) => Self::Empty,
            ([only], Some(flag)) if only.property == flag => {
                match (only.old_value.as_str(), only.new_value.as_str()) {
                    (FLAG_OFF, FLAG_ON) => Self::FlagOnly(FlagTransition::Raised),
                    (FLAG_ON, FLAG_OFF) => Self::FlagOnly(FlagTransition::Cleared),
                    _ => Self::General,
                }
            }
            _ => Self::General,
        }
    }
}

/// Pick the event kind for a diff of the given shape.
///
/// Returns `None` for an empty diff: nothing is logged for a no-op edit.
pub fn classify(entity: EntityKind, shape: ChangeShape) -> Option<EventKind> {
    match shape {
        ChangeShape::Empty => None,
        ChangeShape::FlagOnly(FlagTransition::Raised) => {
            Some(entity.archived().unwrap_or_else(|| entity.updated()))
        }
        ChangeShape::FlagOnly(FlagTransition::Cleared) => {
            Some(entity.unarchived().unwrap_or_else(|| entity.updated()))
        }
        ChangeShape::General => Some(entity.updated()),
    }
}

/// Diff two versions of a record and classify the result.
pub fn compute_and_classify<T: Audited>(old: &T, new: &T) -> (Option<EventKind>, Vec<FieldChange>) {
    let changes = build_scalar_diff(old, new);
    let shape = ChangeShape::of(&changes, T::ARCHIVE_FLAG);
    (classify(T::KIND, shape), changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::types::id::{PluginId, ProjectId, TeamId};
    use catalog_entity::plugin::GlobalPlugin;
    use catalog_entity::project::Project;
    use catalog_entity::team::Team;
    use chrono::{TimeZone, Utc};

    use crate::tracked::ProjectAuditView;

    fn project() -> ProjectAuditView {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let project = Project {
            id: ProjectId(1),
            name: "Apollo".into(),
            client_name: "Old Client".into(),
            offer_id: "Offer A".into(),
            notes: None,
            team_id: None,
            is_archived: false,
            created_at: at,
            updated_at: at,
        };
        ProjectAuditView::new(project, None)
    }

    #[test]
    fn test_scalar_edit_is_updated_project() {
        let old = project();
        let mut new = old.clone();
        new.project.client_name = "New Client".into();
        new.project.offer_id = "Updated Offer".into();

        let (kind, changes) = compute_and_classify(&old, &new);

        assert_eq!(kind, Some(EventKind::UpdatedProject));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_archiving_alone_is_archived_project() {
        let old = project();
        let mut new = old.clone();
        new.project.is_archived = true;

        let (kind, changes) = compute_and_classify(&old, &new);

        assert_eq!(kind, Some(EventKind::ArchivedProject));
        assert_eq!(changes, vec![FieldChange::new("IsArchived", "False", "True")]);

        let (kind, _) = compute_and_classify(&new, &old);
        assert_eq!(kind, Some(EventKind::UnarchivedProject));
    }

    #[test]
    fn test_archiving_with_other_edits_is_updated() {
        let old = project();
        let mut new = old.clone();
        new.project.is_archived = true;
        new.project.notes = Some("closing down".into());

        let (kind, changes) = compute_and_classify(&old, &new);

        assert_eq!(kind, Some(EventKind::UpdatedProject));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_team_move_is_updated_project() {
        let old = project();
        let mut new = old.clone();
        new.project.team_id = Some(TeamId(4));
        new.team = Some("Platform".into());

        let (kind, changes) = compute_and_classify(&old, &new);

        assert_eq!(kind, Some(EventKind::UpdatedProject));
        assert_eq!(changes, vec![FieldChange::new("Team", "", "Platform")]);
    }

    #[test]
    fn test_no_change_is_no_event() {
        let old = project();
        assert_eq!(compute_and_classify(&old, &old.clone()), (None, Vec::new()));
    }

    #[test]
    fn test_global_plugin_archive() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let old = GlobalPlugin {
            id: PluginId(1),
            name: "Jira".into(),
            description: None,
            is_archived: true,
            created_at: at,
            updated_at: at,
        };
        let mut new = old.clone();
        new.is_archived = false;

        let (kind, _) = compute_and_classify(&old, &new);
        assert_eq!(kind, Some(EventKind::UnarchivedGlobalPlugin));
    }

    #[test]
    fn test_flag_shape_on_kind_without_archive_event_falls_back() {
        let changes = vec![FieldChange::new("IsArchived", "False", "True")];
        let shape = ChangeShape::of(&changes, Some("IsArchived"));
        assert_eq!(shape, ChangeShape::FlagOnly(FlagTransition::Raised));
        assert_eq!(classify(EntityKind::Team, shape), Some(EventKind::UpdatedTeam));
    }

    #[test]
    fn test_shape_without_archive_flag_is_general() {
        let changes = vec![FieldChange::new("IsArchived", "False", "True")];
        assert_eq!(ChangeShape::of(&changes, None), ChangeShape::General);
        assert_eq!(ChangeShape::of(&[], None), ChangeShape::Empty);
    }

    #[test]
    fn test_team_rename_is_updated_team() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let old = Team {
            id: TeamId(1),
            name: "Core".into(),
            description: None,
            created_at: at,
            updated_at: at,
        };
        let mut new = old.clone();
        new.name = "Platform".into();
        let (kind, changes) = compute_and_classify(&old, &new);
        assert_eq!(kind, Some(EventKind::UpdatedTeam));
        assert_eq!(changes, vec![FieldChange::new("TeamName", "Core", "Platform")]);
    }
}
