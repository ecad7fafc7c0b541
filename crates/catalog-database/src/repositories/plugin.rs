//! Global plugin repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::id::PluginId;
use catalog_entity::plugin::{CreatePlugin, GlobalPlugin};

use super::write_error;

/// SQL for the `plugins` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginRepository;

impl PluginRepository {
    /// Find a plugin by primary key.
    pub async fn find_by_id(conn: &mut PgConnection, id: PluginId) -> AppResult<Option<GlobalPlugin>> {
        sqlx::query_as::<_, GlobalPlugin>("SELECT * FROM plugins WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find plugin", e))
    }

    /// Find a plugin by name (case-insensitive).
    pub async fn find_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> AppResult<Option<GlobalPlugin>> {
        sqlx::query_as::<_, GlobalPlugin>("SELECT * FROM plugins WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find plugin by name", e)
            })
    }

    /// Names of the plugins among `ids` that exist.
    pub async fn names_for(
        conn: &mut PgConnection,
        ids: &[PluginId],
    ) -> AppResult<HashMap<PluginId, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows = sqlx::query_as::<_, (PluginId, String)>(
            "SELECT id, name FROM plugins WHERE id = ANY($1)",
        )
        .bind(raw)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve plugins", e))?;
        Ok(rows.into_iter().collect())
    }

    /// Insert a new plugin.
    pub async fn create(
        conn: &mut PgConnection,
        data: &CreatePlugin,
        at: DateTime<Utc>,
    ) -> AppResult<GlobalPlugin> {
        sqlx::query_as::<_, GlobalPlugin>(
            "INSERT INTO plugins (name, description, is_archived, created_at, updated_at) \
             VALUES ($1, $2, FALSE, $3, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| write_error("Failed to create plugin", e))
    }

    /// Overwrite every mutable column.
    pub async fn update(conn: &mut PgConnection, plugin: &GlobalPlugin) -> AppResult<()> {
        sqlx::query(
            "UPDATE plugins SET name = $2, description = $3, is_archived = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(plugin.id)
        .bind(&plugin.name)
        .bind(&plugin.description)
        .bind(plugin.is_archived)
        .bind(plugin.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| write_error("Failed to update plugin", e))?;
        Ok(())
    }

    /// Delete a plugin.
    pub async fn delete(conn: &mut PgConnection, id: PluginId) -> AppResult<()> {
        sqlx::query("DELETE FROM plugins WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete plugin", e))?;
        Ok(())
    }
}
