//! The store seam used by every command and query.
//!
//! A command opens one transaction, does all of its reads and writes
//! through it, and either commits or drops it. Dropping an uncommitted
//! transaction discards its writes.

pub mod memory;
pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_core::result::AppResult;
use catalog_core::types::id::{LogId, PluginId, ProjectId, ProjectPluginId, TeamId, UserId};
use catalog_core::types::pagination::{PageRequest, PageResponse};
use catalog_entity::log::{EventKind, LogEntry, LogSubject, NewLogEntry};
use catalog_entity::plugin::{CreatePlugin, GlobalPlugin};
use catalog_entity::project::{CreateProject, CreateProjectPlugin, Project, ProjectPlugin};
use catalog_entity::team::{CreateTeam, Team};
use catalog_entity::user::{CreateUser, User};

/// Structured filters for reading the audit log.
///
/// Subject filters match entries whose subject reference still points at
/// the given record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Entries about this project or its plugin attachments.
    pub project_id: Option<ProjectId>,
    /// Entries about this team.
    pub team_id: Option<TeamId>,
    /// Entries about this global plugin.
    pub plugin_id: Option<PluginId>,
    /// Entries about this user.
    pub user_id: Option<UserId>,
    /// Entries of exactly this kind.
    pub event_kind: Option<EventKind>,
}

impl LogFilter {
    /// Whether `entry` passes every filter that is set.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let subject_ok = match &entry.subject {
            LogSubject::Project(r) => {
                self.team_id.is_none()
                    && self.plugin_id.is_none()
                    && self.user_id.is_none()
                    && self.project_id.is_none_or(|id| r.id == Some(id))
            }
            LogSubject::Team(r) => {
                self.project_id.is_none()
                    && self.plugin_id.is_none()
                    && self.user_id.is_none()
                    && self.team_id.is_none_or(|id| r.id == Some(id))
            }
            LogSubject::Plugin(r) => {
                self.project_id.is_none()
                    && self.team_id.is_none()
                    && self.user_id.is_none()
                    && self.plugin_id.is_none_or(|id| r.id == Some(id))
            }
            LogSubject::User(r) => {
                self.project_id.is_none()
                    && self.team_id.is_none()
                    && self.plugin_id.is_none()
                    && self.user_id.is_none_or(|id| r.id == Some(id))
            }
        };
        subject_ok && self.event_kind.is_none_or(|kind| entry.event_kind == kind)
    }
}

/// A source of catalog transactions.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// The transaction type handed out by [`CatalogStore::begin`].
    type Tx: CatalogTransaction;

    /// Open a new transaction.
    async fn begin(&self) -> AppResult<Self::Tx>;

    /// Read log entries matching `filter`, newest first with ties broken by
    /// id descending.
    async fn query_logs(&self, filter: &LogFilter) -> AppResult<Vec<LogEntry>>;

    /// One page of the entries [`CatalogStore::query_logs`] would return,
    /// with the total match count.
    async fn page_logs(
        &self,
        filter: &LogFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LogEntry>>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// All reads and writes a command may perform, scoped to one transaction.
#[async_trait]
pub trait CatalogTransaction: Send {
    // Projects

    /// Load a project by id.
    async fn find_project(&mut self, id: ProjectId) -> AppResult<Option<Project>>;
    /// Load a project by name, ignoring case.
    async fn find_project_by_name(&mut self, name: &str) -> AppResult<Option<Project>>;
    /// Projects owned by a team, by id.
    async fn list_team_projects(&mut self, team_id: TeamId) -> AppResult<Vec<Project>>;
    /// Insert a project.
    async fn insert_project(&mut self, data: &CreateProject, at: DateTime<Utc>)
    -> AppResult<Project>;
    /// Overwrite a project's mutable columns.
    async fn update_project(&mut self, project: &Project) -> AppResult<()>;
    /// Delete a project and its attachments.
    async fn delete_project(&mut self, id: ProjectId) -> AppResult<()>;

    // Project plugin attachments

    /// A project's attachments in insertion order.
    async fn list_project_plugins(&mut self, project_id: ProjectId)
    -> AppResult<Vec<ProjectPlugin>>;
    /// Attach a plugin to a project.
    async fn insert_project_plugin(&mut self, data: &CreateProjectPlugin)
    -> AppResult<ProjectPlugin>;
    /// Overwrite an attachment's URL and display name.
    async fn update_project_plugin(&mut self, attachment: &ProjectPlugin) -> AppResult<()>;
    /// Detach a plugin from a project.
    async fn delete_project_plugin(&mut self, id: ProjectPluginId) -> AppResult<()>;

    // Teams

    /// Load a team by id.
    async fn find_team(&mut self, id: TeamId) -> AppResult<Option<Team>>;
    /// Load a team by name, ignoring case.
    async fn find_team_by_name(&mut self, name: &str) -> AppResult<Option<Team>>;
    /// Insert a team.
    async fn insert_team(&mut self, data: &CreateTeam, at: DateTime<Utc>) -> AppResult<Team>;
    /// Overwrite a team's mutable columns.
    async fn update_team(&mut self, team: &Team) -> AppResult<()>;
    /// Delete a team. Projects that referenced it are left without a team.
    async fn delete_team(&mut self, id: TeamId) -> AppResult<()>;

    // Global plugins

    /// Load a global plugin by id.
    async fn find_plugin(&mut self, id: PluginId) -> AppResult<Option<GlobalPlugin>>;
    /// Load a global plugin by name, ignoring case.
    async fn find_plugin_by_name(&mut self, name: &str) -> AppResult<Option<GlobalPlugin>>;
    /// Insert a global plugin.
    async fn insert_plugin(&mut self, data: &CreatePlugin, at: DateTime<Utc>)
    -> AppResult<GlobalPlugin>;
    /// Overwrite a global plugin's mutable columns.
    async fn update_plugin(&mut self, plugin: &GlobalPlugin) -> AppResult<()>;
    /// Delete a global plugin.
    async fn delete_plugin(&mut self, id: PluginId) -> AppResult<()>;
    /// Names of the given global plugins. Ids with no plugin are absent from
    /// the map.
    async fn plugin_names_for(&mut self, ids: &[PluginId]) -> AppResult<HashMap<PluginId, String>>;
    /// How many project attachments reference a global plugin.
    async fn count_plugin_attachments(&mut self, id: PluginId) -> AppResult<i64>;

    // Users

    /// Load a user by id.
    async fn find_user(&mut self, id: UserId) -> AppResult<Option<User>>;
    /// Load a user by email, ignoring case.
    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>>;
    /// Insert a user.
    async fn insert_user(&mut self, data: &CreateUser, at: DateTime<Utc>) -> AppResult<User>;
    /// Overwrite a user's mutable columns.
    async fn update_user(&mut self, user: &User) -> AppResult<()>;
    /// Delete a user. Log entries keep the user's display snapshot.
    async fn delete_user(&mut self, id: UserId) -> AppResult<()>;

    // Log

    /// Append a log entry with its ordered changes.
    async fn insert_log(&mut self, entry: &NewLogEntry) -> AppResult<LogId>;

    /// Make every write in this transaction durable.
    async fn commit(self) -> AppResult<()>;
    /// Discard every write in this transaction.
    async fn rollback(self) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_entity::log::SubjectRef;

    fn entry(subject: LogSubject, kind: EventKind) -> LogEntry {
        LogEntry {
            id: LogId(1),
            timestamp: Utc::now(),
            actor_id: None,
            actor_display: "System".into(),
            subject,
            event_kind: kind,
            changes: Vec::new(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let e = entry(LogSubject::team(TeamId(1), "Core"), EventKind::RemovedTeam);
        assert!(LogFilter::default().matches(&e));
    }

    #[test]
    fn test_subject_filter() {
        let e = entry(
            LogSubject::project(ProjectId(3), "Apollo"),
            EventKind::UpdatedProjectPlugin,
        );
        let by_project = LogFilter {
            project_id: Some(ProjectId(3)),
            ..Default::default()
        };
        let other_project = LogFilter {
            project_id: Some(ProjectId(4)),
            ..Default::default()
        };
        let by_team = LogFilter {
            team_id: Some(TeamId(3)),
            ..Default::default()
        };
        assert!(by_project.matches(&e));
        assert!(!other_project.matches(&e));
        assert!(!by_team.matches(&e));
    }

    #[test]
    fn test_detached_subject_no_longer_matches_id() {
        let e = entry(
            LogSubject::Project(SubjectRef {
                id: None,
                name: "Apollo".into(),
            }),
            EventKind::RemovedProject,
        );
        let filter = LogFilter {
            project_id: Some(ProjectId(3)),
            ..Default::default()
        };
        assert!(!filter.matches(&e));
        assert!(LogFilter::default().matches(&e));
    }

    #[test]
    fn test_kind_filter() {
        let e = entry(LogSubject::user(UserId(1), "ada@example.com"), EventKind::AddedUser);
        let filter = LogFilter {
            event_kind: Some(EventKind::RemovedUser),
            ..Default::default()
        };
        assert!(!filter.matches(&e));
    }
}
