//! User repository.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::id::UserId;
use catalog_entity::user::{CreateUser, User};

use super::write_error;

/// SQL for the `users` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRepository;

impl UserRepository {
    /// Find a user by primary key.
    pub async fn find_by_id(conn: &mut PgConnection, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(conn: &mut PgConnection, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Insert a new user.
    pub async fn create(
        conn: &mut PgConnection,
        data: &CreateUser,
        at: DateTime<Utc>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, full_name, role, is_active, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, TRUE, $4, $5, $5) RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(data.role)
        .bind(&data.password_hash)
        .bind(at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| write_error("Failed to create user", e))
    }

    /// Overwrite every mutable column.
    pub async fn update(conn: &mut PgConnection, user: &User) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET email = $2, full_name = $3, role = $4, is_active = $5, \
             password_hash = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.is_active)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| write_error("Failed to update user", e))?;
        Ok(())
    }

    /// Delete a user.
    pub async fn delete(conn: &mut PgConnection, id: UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;
        Ok(())
    }
}
