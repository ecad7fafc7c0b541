//! Project repository.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::id::{ProjectId, TeamId};
use catalog_entity::project::{CreateProject, Project};

use super::write_error;

/// SQL for the `projects` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectRepository;

impl ProjectRepository {
    /// Find a project by primary key.
    pub async fn find_by_id(conn: &mut PgConnection, id: ProjectId) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find project", e))
    }

    /// Find a project by name (case-insensitive).
    pub async fn find_by_name(conn: &mut PgConnection, name: &str) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find project by name", e)
            })
    }

    /// Projects owned by a team.
    pub async fn find_by_team(conn: &mut PgConnection, team_id: TeamId) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE team_id = $1 ORDER BY id")
            .bind(team_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list team projects", e)
            })
    }

    /// Insert a new project.
    pub async fn create(
        conn: &mut PgConnection,
        data: &CreateProject,
        at: DateTime<Utc>,
    ) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name, client_name, offer_id, notes, team_id, is_archived, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, FALSE, $6, $6) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.client_name)
        .bind(&data.offer_id)
        .bind(&data.notes)
        .bind(data.team_id)
        .bind(at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| write_error("Failed to create project", e))
    }

    /// Overwrite every mutable column.
    pub async fn update(conn: &mut PgConnection, project: &Project) -> AppResult<()> {
        sqlx::query(
            "UPDATE projects SET name = $2, client_name = $3, offer_id = $4, notes = $5, \
             team_id = $6, is_archived = $7, updated_at = $8 WHERE id = $1",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.client_name)
        .bind(&project.offer_id)
        .bind(&project.notes)
        .bind(project.team_id)
        .bind(project.is_archived)
        .bind(project.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| write_error("Failed to update project", e))?;
        Ok(())
    }

    /// Delete a project. Its attachments go with it.
    pub async fn delete(conn: &mut PgConnection, id: ProjectId) -> AppResult<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete project", e))?;
        Ok(())
    }
}
