//! Team repository.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::id::TeamId;
use catalog_entity::team::{CreateTeam, Team};

use super::write_error;

/// SQL for the `teams` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamRepository;

impl TeamRepository {
    /// Find a team by primary key.
    pub async fn find_by_id(conn: &mut PgConnection, id: TeamId) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find team", e))
    }

    /// Find a team by name (case-insensitive).
    pub async fn find_by_name(conn: &mut PgConnection, name: &str) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find team by name", e)
            })
    }

    /// Insert a new team.
    pub async fn create(
        conn: &mut PgConnection,
        data: &CreateTeam,
        at: DateTime<Utc>,
    ) -> AppResult<Team> {
        sqlx::query_as::<_, Team>(
            "INSERT INTO teams (name, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| write_error("Failed to create team", e))
    }

    /// Overwrite every mutable column.
    pub async fn update(conn: &mut PgConnection, team: &Team) -> AppResult<()> {
        sqlx::query("UPDATE teams SET name = $2, description = $3, updated_at = $4 WHERE id = $1")
            .bind(team.id)
            .bind(&team.name)
            .bind(&team.description)
            .bind(team.updated_at)
            .execute(&mut *conn)
            .await
            .map_err(|e| write_error("Failed to update team", e))?;
        Ok(())
    }

    /// Delete a team.
    pub async fn delete(conn: &mut PgConnection, id: TeamId) -> AppResult<()> {
        sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete team", e))?;
        Ok(())
    }
}
