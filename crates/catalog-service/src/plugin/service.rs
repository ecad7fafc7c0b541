//! Global plugin command handlers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use catalog_audit::{LogDraft, compute_and_classify};
use catalog_core::config::CatalogConfig;
use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::actor::ActorContext;
use catalog_core::types::id::PluginId;
use catalog_database::{CatalogStore, CatalogTransaction};
use catalog_entity::log::LogSubject;
use catalog_entity::plugin::{CreatePlugin, GlobalPlugin};

use crate::audit::AuditLedger;
use crate::validation::{check_optional_length, require_text};

/// Request to register a global plugin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePluginRequest {
    /// Unique plugin name.
    pub name: String,
    /// What the plugin is.
    pub description: Option<String>,
}

/// Request to edit a global plugin. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePluginRequest {
    /// New name.
    pub name: Option<String>,
    /// New description; an empty string clears it.
    pub description: Option<String>,
    /// New archive state.
    pub is_archived: Option<bool>,
}

/// Handles global plugin commands.
#[derive(Debug)]
pub struct PluginService<S: CatalogStore> {
    store: Arc<S>,
    ledger: Arc<AuditLedger>,
    limits: CatalogConfig,
}

impl<S: CatalogStore> Clone for PluginService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: Arc::clone(&self.ledger),
            limits: self.limits.clone(),
        }
    }
}

fn plugin_not_found(id: PluginId) -> AppError {
    AppError::not_found(format!("Plugin {id} not found"))
}

impl<S: CatalogStore> PluginService<S> {
    /// Creates a new plugin service.
    pub fn new(store: Arc<S>, ledger: Arc<AuditLedger>, limits: CatalogConfig) -> Self {
        Self {
            store,
            ledger,
            limits,
        }
    }

    /// Register a plugin.
    pub async fn create(
        &self,
        actor: &ActorContext,
        req: CreatePluginRequest,
    ) -> AppResult<GlobalPlugin> {
        require_text("Plugin name", &req.name, self.limits.max_name_length)?;
        check_optional_length(
            "Description",
            req.description.as_deref(),
            self.limits.max_text_length,
        )?;

        let mut tx = self.store.begin().await?;
        if tx.find_plugin_by_name(&req.name).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Plugin name '{}' is already in use",
                req.name
            )));
        }

        let plugin = tx
            .insert_plugin(
                &CreatePlugin {
                    name: req.name,
                    description: req.description.filter(|d| !d.is_empty()),
                },
                self.ledger.clock().utc_now(),
            )
            .await?;
        let draft = LogDraft::created(LogSubject::plugin(plugin.id, &plugin.name), &plugin);
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.commit().await?;

        info!(plugin_id = %plugin.id, name = %plugin.name, "Plugin created");
        Ok(plugin)
    }

    /// Apply an edit. Writes and logs nothing when nothing changes.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: PluginId,
        req: UpdatePluginRequest,
    ) -> AppResult<GlobalPlugin> {
        if let Some(name) = &req.name {
            require_text("Plugin name", name, self.limits.max_name_length)?;
        }
        check_optional_length(
            "Description",
            req.description.as_deref(),
            self.limits.max_text_length,
        )?;

        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_plugin(id)
            .await?
            .ok_or_else(|| plugin_not_found(id))?;

        if let Some(name) = &req.name {
            if let Some(other) = tx.find_plugin_by_name(name).await? {
                if other.id != id {
                    return Err(AppError::conflict(format!(
                        "Plugin name '{name}' is already in use"
                    )));
                }
            }
        }

        let mut proposed = existing.clone();
        if let Some(name) = req.name {
            proposed.name = name;
        }
        if let Some(description) = req.description {
            proposed.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(is_archived) = req.is_archived {
            proposed.is_archived = is_archived;
        }

        self.apply(tx, actor, existing, proposed).await
    }

    /// Raise or clear the archive flag.
    pub async fn set_archived(
        &self,
        actor: &ActorContext,
        id: PluginId,
        archived: bool,
    ) -> AppResult<GlobalPlugin> {
        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_plugin(id)
            .await?
            .ok_or_else(|| plugin_not_found(id))?;

        let mut proposed = existing.clone();
        proposed.is_archived = archived;
        self.apply(tx, actor, existing, proposed).await
    }

    /// Delete a plugin that no project uses.
    pub async fn delete(&self, actor: &ActorContext, id: PluginId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_plugin(id)
            .await?
            .ok_or_else(|| plugin_not_found(id))?;

        let attached = tx.count_plugin_attachments(id).await?;
        if attached > 0 {
            warn!(plugin_id = %id, attached, "Refusing to delete attached plugin");
            return Err(AppError::conflict(format!(
                "Plugin '{}' is still attached to {attached} project(s)",
                existing.name
            )));
        }

        let draft = LogDraft::removed(LogSubject::plugin(id, &existing.name), &existing);
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.delete_plugin(id).await?;
        tx.commit().await?;

        info!(plugin_id = %id, name = %existing.name, "Plugin deleted");
        Ok(())
    }

    async fn apply(
        &self,
        mut tx: S::Tx,
        actor: &ActorContext,
        existing: GlobalPlugin,
        mut proposed: GlobalPlugin,
    ) -> AppResult<GlobalPlugin> {
        let (kind, changes) = compute_and_classify(&existing, &proposed);
        let Some(kind) = kind else {
            tx.rollback().await?;
            return Ok(existing);
        };

        proposed.updated_at = self.ledger.clock().utc_now();
        tx.update_plugin(&proposed).await?;
        let draft = LogDraft::updated(LogSubject::plugin(proposed.id, &proposed.name), kind, changes)?;
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.commit().await?;

        info!(plugin_id = %proposed.id, kind = %kind, "Plugin updated");
        Ok(proposed)
    }
}
