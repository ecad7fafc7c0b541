//! In-memory catalog store for tests and single-process runs.
//!
//! Transactions are serialized behind a Tokio mutex. Each transaction works
//! on a private copy of the state and swaps it in on commit, so dropping a
//! transaction discards everything it wrote. Foreign key behavior of the
//! PostgreSQL schema (cascades, `SET NULL`, restrict) is reproduced.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::id::{LogId, PluginId, ProjectId, ProjectPluginId, TeamId, UserId};
use catalog_core::types::pagination::{PageRequest, PageResponse};
use catalog_entity::log::{LogEntry, LogSubject, NewLogEntry};
use catalog_entity::plugin::{CreatePlugin, GlobalPlugin};
use catalog_entity::project::{CreateProject, CreateProjectPlugin, Project, ProjectPlugin};
use catalog_entity::team::{CreateTeam, Team};
use catalog_entity::user::{CreateUser, User};

use super::{CatalogStore, CatalogTransaction, LogFilter};

/// Per-table id sequences.
#[derive(Debug, Clone, Default)]
struct Sequences {
    project: i64,
    attachment: i64,
    team: i64,
    plugin: i64,
    user: i64,
    log: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Everything the store holds.
#[derive(Debug, Clone, Default)]
struct CatalogState {
    seq: Sequences,
    projects: BTreeMap<ProjectId, Project>,
    attachments: BTreeMap<ProjectPluginId, ProjectPlugin>,
    teams: BTreeMap<TeamId, Team>,
    plugins: BTreeMap<PluginId, GlobalPlugin>,
    users: BTreeMap<UserId, User>,
    logs: Vec<LogEntry>,
}

impl CatalogState {
    fn detach_log_subjects(&mut self, matches: impl Fn(&LogSubject) -> bool) {
        for entry in self.logs.iter_mut().filter(|e| matches(&e.subject)) {
            entry.subject.detach();
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn duplicate(what: &str, name: &str) -> AppError {
    AppError::conflict(format!("{what} '{name}' already exists"))
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<Mutex<CatalogState>>,
    fail_log_writes: Arc<AtomicBool>,
    entries_read: Arc<AtomicUsize>,
}

impl MemoryCatalogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent log append fail until switched off again.
    pub fn fail_log_writes(&self, fail: bool) {
        self.fail_log_writes.store(fail, Ordering::SeqCst);
        warn!(fail, "Memory store log write failure injection toggled");
    }

    /// Number of committed log entries.
    pub async fn log_count(&self) -> usize {
        self.state.lock().await.logs.len()
    }

    /// Total log entries handed out by reads so far.
    pub fn entries_read(&self) -> usize {
        self.entries_read.load(Ordering::SeqCst)
    }

    fn matching_logs(state: &CatalogState, filter: &LogFilter) -> Vec<LogEntry> {
        let mut entries: Vec<LogEntry> = state
            .logs
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> AppResult<MemoryTransaction> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTransaction {
            guard,
            working,
            fail_log_writes: self.fail_log_writes.clone(),
        })
    }

    async fn query_logs(&self, filter: &LogFilter) -> AppResult<Vec<LogEntry>> {
        let state = self.state.lock().await;
        let entries = Self::matching_logs(&state, filter);
        self.entries_read.fetch_add(entries.len(), Ordering::SeqCst);
        Ok(entries)
    }

    async fn page_logs(
        &self,
        filter: &LogFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LogEntry>> {
        let state = self.state.lock().await;
        let page = PageResponse::from_all(Self::matching_logs(&state, filter), page);
        self.entries_read.fetch_add(page.items.len(), Ordering::SeqCst);
        Ok(page)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// A transaction over [`MemoryCatalogStore`].
///
/// Holds the store lock for its whole lifetime.
#[derive(Debug)]
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<CatalogState>,
    working: CatalogState,
    fail_log_writes: Arc<AtomicBool>,
}

#[async_trait]
impl CatalogTransaction for MemoryTransaction {
    async fn find_project(&mut self, id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self.working.projects.get(&id).cloned())
    }

    async fn find_project_by_name(&mut self, name: &str) -> AppResult<Option<Project>> {
        Ok(self
            .working
            .projects
            .values()
            .find(|p| same_name(&p.name, name))
            .cloned())
    }

    async fn list_team_projects(&mut self, team_id: TeamId) -> AppResult<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .working
            .projects
            .values()
            .filter(|p| p.team_id == Some(team_id))
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.id);
        Ok(projects)
    }

    async fn insert_project(
        &mut self,
        data: &CreateProject,
        at: DateTime<Utc>,
    ) -> AppResult<Project> {
        if self.find_project_by_name(&data.name).await?.is_some() {
            return Err(duplicate("Project", &data.name));
        }
        let project = Project {
            id: ProjectId(next(&mut self.working.seq.project)),
            name: data.name.clone(),
            client_name: data.client_name.clone(),
            offer_id: data.offer_id.clone(),
            notes: data.notes.clone(),
            team_id: data.team_id,
            is_archived: false,
            created_at: at,
            updated_at: at,
        };
        self.working.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&mut self, project: &Project) -> AppResult<()> {
        let clash = self
            .working
            .projects
            .values()
            .any(|p| p.id != project.id && same_name(&p.name, &project.name));
        if clash {
            return Err(duplicate("Project", &project.name));
        }
        match self.working.projects.get_mut(&project.id) {
            Some(slot) => {
                *slot = project.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("Project {} not found", project.id))),
        }
    }

    async fn delete_project(&mut self, id: ProjectId) -> AppResult<()> {
        self.working.projects.remove(&id);
        self.working.attachments.retain(|_, a| a.project_id != id);
        self.working
            .detach_log_subjects(|s| matches!(s, LogSubject::Project(r) if r.id == Some(id)));
        Ok(())
    }

    async fn list_project_plugins(&mut self, project_id: ProjectId) -> AppResult<Vec<ProjectPlugin>> {
        Ok(self
            .working
            .attachments
            .values()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn insert_project_plugin(
        &mut self,
        data: &CreateProjectPlugin,
    ) -> AppResult<ProjectPlugin> {
        if !self.working.plugins.contains_key(&data.plugin_id) {
            return Err(AppError::not_found(format!("Plugin {} not found", data.plugin_id)));
        }
        let clash = self.working.attachments.values().any(|a| {
            a.project_id == data.project_id && a.plugin_id == data.plugin_id && a.url == data.url
        });
        if clash {
            return Err(AppError::conflict(format!(
                "Plugin {} is already attached with URL {}",
                data.plugin_id, data.url
            )));
        }
        let attachment = ProjectPlugin {
            id: ProjectPluginId(next(&mut self.working.seq.attachment)),
            project_id: data.project_id,
            plugin_id: data.plugin_id,
            url: data.url.clone(),
            display_name: data.display_name.clone(),
        };
        self.working
            .attachments
            .insert(attachment.id, attachment.clone());
        Ok(attachment)
    }

    async fn update_project_plugin(&mut self, attachment: &ProjectPlugin) -> AppResult<()> {
        match self.working.attachments.get_mut(&attachment.id) {
            Some(slot) => {
                slot.url = attachment.url.clone();
                slot.display_name = attachment.display_name.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Project plugin {} not found",
                attachment.id
            ))),
        }
    }

    async fn delete_project_plugin(&mut self, id: ProjectPluginId) -> AppResult<()> {
        self.working.attachments.remove(&id);
        Ok(())
    }

    async fn find_team(&mut self, id: TeamId) -> AppResult<Option<Team>> {
        Ok(self.working.teams.get(&id).cloned())
    }

    async fn find_team_by_name(&mut self, name: &str) -> AppResult<Option<Team>> {
        Ok(self
            .working
            .teams
            .values()
            .find(|t| same_name(&t.name, name))
            .cloned())
    }

    async fn insert_team(&mut self, data: &CreateTeam, at: DateTime<Utc>) -> AppResult<Team> {
        if self.find_team_by_name(&data.name).await?.is_some() {
            return Err(duplicate("Team", &data.name));
        }
        let team = Team {
            id: TeamId(next(&mut self.working.seq.team)),
            name: data.name.clone(),
            description: data.description.clone(),
            created_at: at,
            updated_at: at,
        };
        self.working.teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn update_team(&mut self, team: &Team) -> AppResult<()> {
        let clash = self
            .working
            .teams
            .values()
            .any(|t| t.id != team.id && same_name(&t.name, &team.name));
        if clash {
            return Err(duplicate("Team", &team.name));
        }
        match self.working.teams.get_mut(&team.id) {
            Some(slot) => {
                *slot = team.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("Team {} not found", team.id))),
        }
    }

    async fn delete_team(&mut self, id: TeamId) -> AppResult<()> {
        self.working.teams.remove(&id);
        for project in self.working.projects.values_mut() {
            if project.team_id == Some(id) {
                project.team_id = None;
            }
        }
        self.working
            .detach_log_subjects(|s| matches!(s, LogSubject::Team(r) if r.id == Some(id)));
        Ok(())
    }

    async fn find_plugin(&mut self, id: PluginId) -> AppResult<Option<GlobalPlugin>> {
        Ok(self.working.plugins.get(&id).cloned())
    }

    async fn find_plugin_by_name(&mut self, name: &str) -> AppResult<Option<GlobalPlugin>> {
        Ok(self
            .working
            .plugins
            .values()
            .find(|p| same_name(&p.name, name))
            .cloned())
    }

    async fn insert_plugin(
        &mut self,
        data: &CreatePlugin,
        at: DateTime<Utc>,
    ) -> AppResult<GlobalPlugin> {
        if self.find_plugin_by_name(&data.name).await?.is_some() {
            return Err(duplicate("Plugin", &data.name));
        }
        let plugin = GlobalPlugin {
            id: PluginId(next(&mut self.working.seq.plugin)),
            name: data.name.clone(),
            description: data.description.clone(),
            is_archived: false,
            created_at: at,
            updated_at: at,
        };
        self.working.plugins.insert(plugin.id, plugin.clone());
        Ok(plugin)
    }

    async fn update_plugin(&mut self, plugin: &GlobalPlugin) -> AppResult<()> {
        let clash = self
            .working
            .plugins
            .values()
            .any(|p| p.id != plugin.id && same_name(&p.name, &plugin.name));
        if clash {
            return Err(duplicate("Plugin", &plugin.name));
        }
        match self.working.plugins.get_mut(&plugin.id) {
            Some(slot) => {
                *slot = plugin.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("Plugin {} not found", plugin.id))),
        }
    }

    async fn delete_plugin(&mut self, id: PluginId) -> AppResult<()> {
        if self.working.attachments.values().any(|a| a.plugin_id == id) {
            return Err(AppError::conflict(format!(
                "Plugin {id} is still attached to projects"
            )));
        }
        self.working.plugins.remove(&id);
        self.working
            .detach_log_subjects(|s| matches!(s, LogSubject::Plugin(r) if r.id == Some(id)));
        Ok(())
    }

    async fn plugin_names_for(&mut self, ids: &[PluginId]) -> AppResult<HashMap<PluginId, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.working
                    .plugins
                    .get(id)
                    .map(|plugin| (*id, plugin.name.clone()))
            })
            .collect())
    }

    async fn count_plugin_attachments(&mut self, id: PluginId) -> AppResult<i64> {
        let count = self
            .working
            .attachments
            .values()
            .filter(|a| a.plugin_id == id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn find_user(&mut self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .working
            .users
            .values()
            .find(|u| same_name(&u.email, email))
            .cloned())
    }

    async fn insert_user(&mut self, data: &CreateUser, at: DateTime<Utc>) -> AppResult<User> {
        if self.find_user_by_email(&data.email).await?.is_some() {
            return Err(duplicate("User", &data.email));
        }
        let user = User {
            id: UserId(next(&mut self.working.seq.user)),
            email: data.email.clone(),
            full_name: data.full_name.clone(),
            role: data.role,
            is_active: true,
            password_hash: data.password_hash.clone(),
            created_at: at,
            updated_at: at,
        };
        self.working.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&mut self, user: &User) -> AppResult<()> {
        let clash = self
            .working
            .users
            .values()
            .any(|u| u.id != user.id && same_name(&u.email, &user.email));
        if clash {
            return Err(duplicate("User", &user.email));
        }
        match self.working.users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("User {} not found", user.id))),
        }
    }

    async fn delete_user(&mut self, id: UserId) -> AppResult<()> {
        self.working.users.remove(&id);
        for entry in self.working.logs.iter_mut() {
            if entry.actor_id == Some(id) {
                entry.actor_id = None;
            }
        }
        self.working
            .detach_log_subjects(|s| matches!(s, LogSubject::User(r) if r.id == Some(id)));
        Ok(())
    }

    async fn insert_log(&mut self, entry: &NewLogEntry) -> AppResult<LogId> {
        if self.fail_log_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("Injected log write failure"));
        }
        let id = LogId(next(&mut self.working.seq.log));
        self.working.logs.push(entry.clone().into_entry(id));
        debug!(log_id = %id, kind = %entry.event_kind, "Log entry appended");
        Ok(id)
    }

    async fn commit(mut self) -> AppResult<()> {
        *self.guard = self.working;
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        Ok(())
    }
}
