//! Field-level diffs between two versions of a tracked record.

use catalog_entity::log::FieldChange;

use crate::format::format_value;
use crate::tracked::Audited;

/// Compute the ordered list of tracked properties that differ between `old`
/// and `new`.
///
/// Properties are visited in declaration order and compared by their
/// formatted value. Sensitive properties that differ are recorded with both
/// values blank so the secret never reaches the log.
pub fn build_scalar_diff<T: Audited>(old: &T, new: &T) -> Vec<FieldChange> {
    T::PROPERTIES
        .iter()
        .filter_map(|property| {
            let before = format_value(&(property.read)(old));
            let after = format_value(&(property.read)(new));
            if before == after {
                return None;
            }
            Some(if property.sensitive {
                FieldChange::new(property.name, "", "")
            } else {
                FieldChange::new(property.name, before, after)
            })
        })
        .collect()
}

/// Full snapshot of a newly created record: every non-sensitive tracked
/// property with an empty old value.
pub fn creation_snapshot<T: Audited>(new: &T) -> Vec<FieldChange> {
    snapshot(new)
        .map(|(name, value)| FieldChange::new(name, "", value))
        .collect()
}

/// Full snapshot of a record about to be removed: every non-sensitive
/// tracked property with an empty new value.
pub fn removal_snapshot<T: Audited>(old: &T) -> Vec<FieldChange> {
    snapshot(old)
        .map(|(name, value)| FieldChange::new(name, value, ""))
        .collect()
}

fn snapshot<T: Audited>(record: &T) -> impl Iterator<Item = (&'static str, String)> + '_ {
    T::PROPERTIES
        .iter()
        .filter(|property| !property.sensitive)
        .map(move |property| (property.name, format_value(&(property.read)(record))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::types::id::{ProjectId, UserId};
    use catalog_entity::project::Project;
    use catalog_entity::user::{User, UserRole};
    use chrono::{TimeZone, Utc};

    use crate::tracked::ProjectAuditView;

    fn project(client: &str, offer: &str, notes: Option<&str>) -> ProjectAuditView {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let project = Project {
            id: ProjectId(1),
            name: "Apollo".into(),
            client_name: client.into(),
            offer_id: offer.into(),
            notes: notes.map(String::from),
            team_id: None,
            is_archived: false,
            created_at: at,
            updated_at: at,
        };
        ProjectAuditView::new(project, None)
    }

    fn user() -> User {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        User {
            id: UserId(1),
            email: "ada@example.com".into(),
            full_name: "Ada".into(),
            role: UserRole::Member,
            is_active: true,
            password_hash: Some("hash-1".into()),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_two_changed_fields_in_declared_order() {
        let old = project("Old Client", "Offer A", Some("N"));
        let new = project("New Client", "Updated Offer", Some("N"));

        let diff = build_scalar_diff(&old, &new);

        assert_eq!(
            diff,
            vec![
                FieldChange::new("ClientName", "Old Client", "New Client"),
                FieldChange::new("OfferId", "Offer A", "Updated Offer"),
            ]
        );
    }

    #[test]
    fn test_identical_records_have_empty_diff() {
        let old = project("Client", "Offer", None);
        assert!(build_scalar_diff(&old, &old.clone()).is_empty());
    }

    #[test]
    fn test_untracked_fields_are_ignored() {
        let old = project("Client", "Offer", None);
        let mut new = old.clone();
        new.project.id = ProjectId(99);
        new.project.updated_at = Utc::now();
        assert!(build_scalar_diff(&old, &new).is_empty());
    }

    #[test]
    fn test_team_is_compared_by_name() {
        let old = project("Client", "Offer", None);
        let mut new = old.clone();
        new.project.team_id = Some(catalog_core::types::id::TeamId(3));
        new.team = Some("Core".into());

        assert_eq!(
            build_scalar_diff(&old, &new),
            vec![FieldChange::new("Team", "", "Core")]
        );
    }

    #[test]
    fn test_absent_equals_empty() {
        let old = project("Client", "Offer", None);
        let new = project("Client", "Offer", Some(""));
        assert!(build_scalar_diff(&old, &new).is_empty());
    }

    #[test]
    fn test_diff_is_symmetric() {
        let a = project("Old Client", "Offer A", None);
        let b = project("New Client", "Offer A", Some("first note"));

        let forward = build_scalar_diff(&a, &b);
        let backward = build_scalar_diff(&b, &a);

        assert_eq!(forward.len(), 2);
        let reversed: Vec<_> = backward.iter().map(FieldChange::reversed).collect();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_sensitive_change_is_masked() {
        let old = user();
        let mut new = old.clone();
        new.password_hash = Some("hash-2".into());
        new.role = UserRole::Admin;

        let diff = build_scalar_diff(&old, &new);

        assert_eq!(
            diff,
            vec![
                FieldChange::new("Role", "Member", "Admin"),
                FieldChange::new("Password", "", ""),
            ]
        );
    }

    #[test]
    fn test_creation_snapshot_has_empty_old_values() {
        let snapshot = creation_snapshot(&project("Client", "Offer", None));
        let names: Vec<_> = snapshot.iter().map(|c| c.property.as_str()).collect();
        assert_eq!(
            names,
            vec!["ProjectName", "ClientName", "OfferId", "Notes", "Team", "IsArchived"]
        );
        assert!(snapshot.iter().all(|c| c.old_value.is_empty()));
        assert_eq!(snapshot[5].new_value, "False");
    }

    #[test]
    fn test_removal_snapshot_skips_sensitive_and_empties_new_values() {
        let snapshot = removal_snapshot(&user());
        assert!(snapshot.iter().all(|c| c.new_value.is_empty()));
        assert!(snapshot.iter().all(|c| c.property != "Password"));
        assert_eq!(snapshot[0], FieldChange::new("Email", "ada@example.com", ""));
    }
}
