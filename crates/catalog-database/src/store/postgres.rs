//! PostgreSQL-backed catalog store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::id::{LogId, PluginId, ProjectId, ProjectPluginId, TeamId, UserId};
use catalog_core::types::pagination::{PageRequest, PageResponse};
use catalog_entity::log::{LogEntry, NewLogEntry};
use catalog_entity::plugin::{CreatePlugin, GlobalPlugin};
use catalog_entity::project::{CreateProject, CreateProjectPlugin, Project, ProjectPlugin};
use catalog_entity::team::{CreateTeam, Team};
use catalog_entity::user::{CreateUser, User};

use super::{CatalogStore, CatalogTransaction, LogFilter};
use crate::repositories::{
    LogRepository, PluginRepository, ProjectPluginRepository, ProjectRepository, TeamRepository,
    UserRepository,
};

/// Catalog store over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Wrap an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    type Tx = PgCatalogTransaction;

    async fn begin(&self) -> AppResult<PgCatalogTransaction> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(PgCatalogTransaction { tx })
    }

    async fn query_logs(&self, filter: &LogFilter) -> AppResult<Vec<LogEntry>> {
        LogRepository::search(&self.pool, filter).await
    }

    async fn page_logs(
        &self,
        filter: &LogFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LogEntry>> {
        LogRepository::search_page(&self.pool, filter, page).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// One open PostgreSQL transaction.
///
/// Dropping it without calling [`CatalogTransaction::commit`] rolls back.
#[derive(Debug)]
pub struct PgCatalogTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CatalogTransaction for PgCatalogTransaction {
    async fn find_project(&mut self, id: ProjectId) -> AppResult<Option<Project>> {
        ProjectRepository::find_by_id(&mut *self.tx, id).await
    }

    async fn find_project_by_name(&mut self, name: &str) -> AppResult<Option<Project>> {
        ProjectRepository::find_by_name(&mut *self.tx, name).await
    }

    async fn list_team_projects(&mut self, team_id: TeamId) -> AppResult<Vec<Project>> {
        ProjectRepository::find_by_team(&mut *self.tx, team_id).await
    }

    async fn insert_project(
        &mut self,
        data: &CreateProject,
        at: DateTime<Utc>,
    ) -> AppResult<Project> {
        ProjectRepository::create(&mut *self.tx, data, at).await
    }

    async fn update_project(&mut self, project: &Project) -> AppResult<()> {
        ProjectRepository::update(&mut *self.tx, project).await
    }

    async fn delete_project(&mut self, id: ProjectId) -> AppResult<()> {
        ProjectRepository::delete(&mut *self.tx, id).await
    }

    async fn list_project_plugins(&mut self, project_id: ProjectId) -> AppResult<Vec<ProjectPlugin>> {
        ProjectPluginRepository::find_by_project(&mut *self.tx, project_id).await
    }

    async fn insert_project_plugin(
        &mut self,
        data: &CreateProjectPlugin,
    ) -> AppResult<ProjectPlugin> {
        ProjectPluginRepository::create(&mut *self.tx, data).await
    }

    async fn update_project_plugin(&mut self, attachment: &ProjectPlugin) -> AppResult<()> {
        ProjectPluginRepository::update(&mut *self.tx, attachment).await
    }

    async fn delete_project_plugin(&mut self, id: ProjectPluginId) -> AppResult<()> {
        ProjectPluginRepository::delete(&mut *self.tx, id).await
    }

    async fn find_team(&mut self, id: TeamId) -> AppResult<Option<Team>> {
        TeamRepository::find_by_id(&mut *self.tx, id).await
    }

    async fn find_team_by_name(&mut self, name: &str) -> AppResult<Option<Team>> {
        TeamRepository::find_by_name(&mut *self.tx, name).await
    }

    async fn insert_team(&mut self, data: &CreateTeam, at: DateTime<Utc>) -> AppResult<Team> {
        TeamRepository::create(&mut *self.tx, data, at).await
    }

    async fn update_team(&mut self, team: &Team) -> AppResult<()> {
        TeamRepository::update(&mut *self.tx, team).await
    }

    async fn delete_team(&mut self, id: TeamId) -> AppResult<()> {
        TeamRepository::delete(&mut *self.tx, id).await
    }

    async fn find_plugin(&mut self, id: PluginId) -> AppResult<Option<GlobalPlugin>> {
        PluginRepository::find_by_id(&mut *self.tx, id).await
    }

    async fn find_plugin_by_name(&mut self, name: &str) -> AppResult<Option<GlobalPlugin>> {
        PluginRepository::find_by_name(&mut *self.tx, name).await
    }

    async fn insert_plugin(
        &mut self,
        data: &CreatePlugin,
        at: DateTime<Utc>,
    ) -> AppResult<GlobalPlugin> {
        PluginRepository::create(&mut *self.tx, data, at).await
    }

    async fn update_plugin(&mut self, plugin: &GlobalPlugin) -> AppResult<()> {
        PluginRepository::update(&mut *self.tx, plugin).await
    }

    async fn delete_plugin(&mut self, id: PluginId) -> AppResult<()> {
        PluginRepository::delete(&mut *self.tx, id).await
    }

    async fn plugin_names_for(&mut self, ids: &[PluginId]) -> AppResult<HashMap<PluginId, String>> {
        PluginRepository::names_for(&mut *self.tx, ids).await
    }

    async fn count_plugin_attachments(&mut self, id: PluginId) -> AppResult<i64> {
        ProjectPluginRepository::count_by_plugin(&mut *self.tx, id).await
    }

    async fn find_user(&mut self, id: UserId) -> AppResult<Option<User>> {
        UserRepository::find_by_id(&mut *self.tx, id).await
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_email(&mut *self.tx, email).await
    }

    async fn insert_user(&mut self, data: &CreateUser, at: DateTime<Utc>) -> AppResult<User> {
        UserRepository::create(&mut *self.tx, data, at).await
    }

    async fn update_user(&mut self, user: &User) -> AppResult<()> {
        UserRepository::update(&mut *self.tx, user).await
    }

    async fn delete_user(&mut self, id: UserId) -> AppResult<()> {
        UserRepository::delete(&mut *self.tx, id).await
    }

    async fn insert_log(&mut self, entry: &NewLogEntry) -> AppResult<LogId> {
        let id = LogRepository::create(&mut *self.tx, entry).await?;
        debug!(log_id = %id, kind = %entry.event_kind, "Log entry appended");
        Ok(id)
    }

    async fn commit(self) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn rollback(self) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}
