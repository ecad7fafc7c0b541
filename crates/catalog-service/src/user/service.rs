//! User command handlers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use catalog_audit::{LogDraft, compute_and_classify};
use catalog_core::config::CatalogConfig;
use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::actor::ActorContext;
use catalog_core::types::id::UserId;
use catalog_database::{CatalogStore, CatalogTransaction};
use catalog_entity::log::LogSubject;
use catalog_entity::user::{CreateUser, User, UserRole};

use super::password::PasswordHasher;
use crate::audit::AuditLedger;
use crate::validation::require_text;

/// Request to create a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Unique email address.
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
    /// Initial plaintext password, if the account can log in locally.
    pub password: Option<String>,
}

/// Request to edit a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New email.
    pub email: Option<String>,
    /// New full name.
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// Enable or disable the account.
    pub is_active: Option<bool>,
    /// New plaintext password.
    pub password: Option<String>,
}

/// Handles user commands.
#[derive(Debug)]
pub struct UserService<S: CatalogStore> {
    store: Arc<S>,
    ledger: Arc<AuditLedger>,
    limits: CatalogConfig,
    hasher: PasswordHasher,
}

impl<S: CatalogStore> Clone for UserService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: Arc::clone(&self.ledger),
            limits: self.limits.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

fn email_taken(email: &str) -> AppError {
    AppError::conflict(format!("Email '{email}' is already in use"))
}

impl<S: CatalogStore> UserService<S> {
    /// Creates a new user service.
    pub fn new(store: Arc<S>, ledger: Arc<AuditLedger>, limits: CatalogConfig) -> Self {
        Self {
            store,
            ledger,
            limits,
            hasher: PasswordHasher::new(),
        }
    }

    /// Create a user. The password, if any, is stored hashed and never
    /// appears in the log.
    pub async fn create(&self, actor: &ActorContext, req: CreateUserRequest) -> AppResult<User> {
        require_text("Email", &req.email, self.limits.max_name_length)?;
        require_text("Full name", &req.full_name, self.limits.max_name_length)?;
        let password_hash = match req.password.as_deref() {
            Some(password) => {
                require_text("Password", password, self.limits.max_text_length)?;
                Some(self.hasher.hash_password(password)?)
            }
            None => None,
        };

        let mut tx = self.store.begin().await?;
        if tx.find_user_by_email(&req.email).await?.is_some() {
            return Err(email_taken(&req.email));
        }

        let user = tx
            .insert_user(
                &CreateUser {
                    email: req.email,
                    full_name: req.full_name,
                    role: req.role,
                    password_hash,
                },
                self.ledger.clock().utc_now(),
            )
            .await?;
        let draft = LogDraft::created(LogSubject::user(user.id, &user.email), &user);
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.commit().await?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Apply an edit. Writes and logs nothing when nothing changes.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: UserId,
        req: UpdateUserRequest,
    ) -> AppResult<User> {
        if let Some(email) = &req.email {
            require_text("Email", email, self.limits.max_name_length)?;
        }
        if let Some(full_name) = &req.full_name {
            require_text("Full name", full_name, self.limits.max_name_length)?;
        }
        let password_hash = match req.password.as_deref() {
            Some(password) => {
                require_text("Password", password, self.limits.max_text_length)?;
                Some(self.hasher.hash_password(password)?)
            }
            None => None,
        };

        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        if let Some(email) = &req.email {
            if let Some(other) = tx.find_user_by_email(email).await? {
                if other.id != id {
                    return Err(email_taken(email));
                }
            }
        }

        let mut proposed = existing.clone();
        if let Some(email) = req.email {
            proposed.email = email;
        }
        if let Some(full_name) = req.full_name {
            proposed.full_name = full_name;
        }
        if let Some(role) = req.role {
            proposed.role = role;
        }
        if let Some(is_active) = req.is_active {
            proposed.is_active = is_active;
        }
        if password_hash.is_some() {
            proposed.password_hash = password_hash;
        }

        let (kind, changes) = compute_and_classify(&existing, &proposed);
        let Some(kind) = kind else {
            tx.rollback().await?;
            return Ok(existing);
        };

        proposed.updated_at = self.ledger.clock().utc_now();
        tx.update_user(&proposed).await?;
        let draft = LogDraft::updated(LogSubject::user(id, &proposed.email), kind, changes)?;
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.commit().await?;

        info!(user_id = %id, "User updated");
        Ok(proposed)
    }

    /// Delete a user. Entries they authored keep their display value.
    pub async fn delete(&self, actor: &ActorContext, id: UserId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        let draft = LogDraft::removed(LogSubject::user(id, &existing.email), &existing);
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.delete_user(id).await?;
        tx.commit().await?;

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
