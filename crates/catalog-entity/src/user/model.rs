//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catalog_core::types::id::UserId;

use super::role::UserRole;

/// A catalog user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Credential hash produced by the identity provider.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
    /// Pre-hashed credential.
    pub password_hash: Option<String>,
}
