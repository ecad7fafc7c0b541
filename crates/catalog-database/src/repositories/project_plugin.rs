//! Project plugin attachment repository.

use sqlx::PgConnection;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::id::{PluginId, ProjectId, ProjectPluginId};
use catalog_entity::project::{CreateProjectPlugin, ProjectPlugin};

use super::write_error;

/// SQL for the `project_plugins` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectPluginRepository;

impl ProjectPluginRepository {
    /// A project's attachments in insertion order.
    pub async fn find_by_project(
        conn: &mut PgConnection,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectPlugin>> {
        sqlx::query_as::<_, ProjectPlugin>(
            "SELECT * FROM project_plugins WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list project plugins", e)
        })
    }

    /// Attach a plugin to a project.
    pub async fn create(
        conn: &mut PgConnection,
        data: &CreateProjectPlugin,
    ) -> AppResult<ProjectPlugin> {
        sqlx::query_as::<_, ProjectPlugin>(
            "INSERT INTO project_plugins (project_id, plugin_id, url, display_name) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.project_id)
        .bind(data.plugin_id)
        .bind(&data.url)
        .bind(&data.display_name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| write_error("Failed to attach plugin", e))
    }

    /// Overwrite the attachment's URL and display name.
    pub async fn update(conn: &mut PgConnection, attachment: &ProjectPlugin) -> AppResult<()> {
        sqlx::query("UPDATE project_plugins SET url = $2, display_name = $3 WHERE id = $1")
            .bind(attachment.id)
            .bind(&attachment.url)
            .bind(&attachment.display_name)
            .execute(&mut *conn)
            .await
            .map_err(|e| write_error("Failed to update project plugin", e))?;
        Ok(())
    }

    /// Remove one attachment.
    pub async fn delete(conn: &mut PgConnection, id: ProjectPluginId) -> AppResult<()> {
        sqlx::query("DELETE FROM project_plugins WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to detach plugin", e)
            })?;
        Ok(())
    }

    /// Number of attachments referencing a global plugin.
    pub async fn count_by_plugin(conn: &mut PgConnection, plugin_id: PluginId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project_plugins WHERE plugin_id = $1")
            .bind(plugin_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count plugin attachments", e)
            })
    }
}
