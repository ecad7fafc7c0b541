//! Declares which properties of each catalog record are change-tracked.
//!
//! The declaration order of [`Audited::PROPERTIES`] is the order in which
//! changes appear in the log. Identifiers and bookkeeping timestamps are
//! never tracked. Foreign keys a user edits are tracked through the name of
//! the record they point at.

use catalog_entity::log::EntityKind;
use catalog_entity::plugin::GlobalPlugin;
use catalog_entity::project::{Project, ProjectPlugin};
use catalog_entity::team::Team;
use catalog_entity::user::User;

use crate::format::FieldValue;

/// One tracked property of `T`.
pub struct Property<T: ?Sized> {
    /// Property name as recorded in the log.
    pub name: &'static str,
    /// Reads the property's current value.
    pub read: fn(&T) -> FieldValue,
    /// Compared like any other property but never written to the log.
    pub sensitive: bool,
}

impl<T: ?Sized> Property<T> {
    /// A property recorded with its values.
    pub const fn plain(name: &'static str, read: fn(&T) -> FieldValue) -> Self {
        Self {
            name,
            read,
            sensitive: false,
        }
    }

    /// A property whose values must not be surfaced.
    pub const fn sensitive(name: &'static str, read: fn(&T) -> FieldValue) -> Self {
        Self {
            name,
            read,
            sensitive: true,
        }
    }
}

/// A record whose changes are written to the audit log.
pub trait Audited: 'static {
    /// The audited entity kind.
    const KIND: EntityKind;

    /// Name of the boolean archive flag property, for kinds where raising
    /// and clearing it are distinct events.
    const ARCHIVE_FLAG: Option<&'static str> = None;

    /// Tracked properties in log order.
    const PROPERTIES: &'static [Property<Self>];
}

/// A project as the log sees it: the record plus the name of its team.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectAuditView {
    /// The project record.
    pub project: Project,
    /// Name of the owning team, if any.
    pub team: Option<String>,
}

impl ProjectAuditView {
    /// Pair a project with its team's name.
    pub fn new(project: Project, team: Option<String>) -> Self {
        Self { project, team }
    }
}

impl Audited for ProjectAuditView {
    const KIND: EntityKind = EntityKind::Project;
    const ARCHIVE_FLAG: Option<&'static str> = Some("IsArchived");
    const PROPERTIES: &'static [Property<Self>] = &[
        Property::plain("ProjectName", |v| FieldValue::from(&v.project.name)),
        Property::plain("ClientName", |v| FieldValue::from(&v.project.client_name)),
        Property::plain("OfferId", |v| FieldValue::from(&v.project.offer_id)),
        Property::plain("Notes", |v| FieldValue::from(v.project.notes.clone())),
        Property::plain("Team", |v| FieldValue::from(v.team.clone())),
        Property::plain("IsArchived", |v| FieldValue::from(v.project.is_archived)),
    ];
}

impl Audited for Team {
    const KIND: EntityKind = EntityKind::Team;
    const PROPERTIES: &'static [Property<Self>] = &[
        Property::plain("TeamName", |t| FieldValue::from(&t.name)),
        Property::plain("Description", |t| FieldValue::from(t.description.clone())),
    ];
}

impl Audited for GlobalPlugin {
    const KIND: EntityKind = EntityKind::GlobalPlugin;
    const ARCHIVE_FLAG: Option<&'static str> = Some("IsArchived");
    const PROPERTIES: &'static [Property<Self>] = &[
        Property::plain("PluginName", |p| FieldValue::from(&p.name)),
        Property::plain("Description", |p| FieldValue::from(p.description.clone())),
        Property::plain("IsArchived", |p| FieldValue::from(p.is_archived)),
    ];
}

// `IsActive` is a status flag but users have no archive semantics, so its
// flips are ordinary updates.
impl Audited for User {
    const KIND: EntityKind = EntityKind::User;
    const PROPERTIES: &'static [Property<Self>] = &[
        Property::plain("Email", |u| FieldValue::from(&u.email)),
        Property::plain("FullName", |u| FieldValue::from(&u.full_name)),
        Property::plain("Role", |u| FieldValue::from(u.role)),
        Property::plain("IsActive", |u| FieldValue::from(u.is_active)),
        Property::sensitive("Password", |u| FieldValue::from(u.password_hash.clone())),
    ];
}

/// Properties compared between two matched attachments.
impl Audited for ProjectPlugin {
    const KIND: EntityKind = EntityKind::ProjectPlugin;
    const PROPERTIES: &'static [Property<Self>] = &[
        Property::plain("Url", |a| FieldValue::from(&a.url)),
        Property::plain("DisplayName", |a| FieldValue::from(&a.display_name)),
    ];
}

/// An attachment as recorded when it is added or removed, labelled with the
/// global plugin's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSnapshot {
    /// Name of the referenced global plugin.
    pub plugin: String,
    /// Project-specific URL.
    pub url: String,
    /// Project-specific display label.
    pub display_name: String,
}

impl AttachmentSnapshot {
    /// Label an attachment with its plugin's name.
    pub fn of(attachment: &ProjectPlugin, plugin_name: impl Into<String>) -> Self {
        Self {
            plugin: plugin_name.into(),
            url: attachment.url.clone(),
            display_name: attachment.display_name.clone(),
        }
    }
}

impl Audited for AttachmentSnapshot {
    const KIND: EntityKind = EntityKind::ProjectPlugin;
    const PROPERTIES: &'static [Property<Self>] = &[
        Property::plain("Plugin", |a| FieldValue::from(&a.plugin)),
        Property::plain("Url", |a| FieldValue::from(&a.url)),
        Property::plain("DisplayName", |a| FieldValue::from(&a.display_name)),
    ];
}
