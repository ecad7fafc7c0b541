//! Team command handlers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use catalog_audit::{LogDraft, ProjectAuditView, compute_and_classify};
use catalog_core::config::CatalogConfig;
use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::actor::ActorContext;
use catalog_core::types::id::TeamId;
use catalog_database::{CatalogStore, CatalogTransaction};
use catalog_entity::log::LogSubject;
use catalog_entity::team::{CreateTeam, Team};

use crate::audit::AuditLedger;
use crate::validation::{check_optional_length, require_text};

/// Request to create a team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    /// Unique team name.
    pub name: String,
    /// What the team does.
    pub description: Option<String>,
}

/// Request to edit a team. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeamRequest {
    /// New name.
    pub name: Option<String>,
    /// New description; an empty string clears it.
    pub description: Option<String>,
}

/// Handles team commands.
#[derive(Debug)]
pub struct TeamService<S: CatalogStore> {
    store: Arc<S>,
    ledger: Arc<AuditLedger>,
    limits: CatalogConfig,
}

impl<S: CatalogStore> Clone for TeamService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: Arc::clone(&self.ledger),
            limits: self.limits.clone(),
        }
    }
}

impl<S: CatalogStore> TeamService<S> {
    /// Creates a new team service.
    pub fn new(store: Arc<S>, ledger: Arc<AuditLedger>, limits: CatalogConfig) -> Self {
        Self {
            store,
            ledger,
            limits,
        }
    }

    /// Create a team.
    pub async fn create(&self, actor: &ActorContext, req: CreateTeamRequest) -> AppResult<Team> {
        require_text("Team name", &req.name, self.limits.max_name_length)?;
        check_optional_length(
            "Description",
            req.description.as_deref(),
            self.limits.max_text_length,
        )?;

        let mut tx = self.store.begin().await?;
        if tx.find_team_by_name(&req.name).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Team name '{}' is already in use",
                req.name
            )));
        }

        let team = tx
            .insert_team(
                &CreateTeam {
                    name: req.name,
                    description: req.description.filter(|d| !d.is_empty()),
                },
                self.ledger.clock().utc_now(),
            )
            .await?;
        let draft = LogDraft::created(LogSubject::team(team.id, &team.name), &team);
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.commit().await?;

        info!(team_id = %team.id, name = %team.name, "Team created");
        Ok(team)
    }

    /// Apply an edit. Writes and logs nothing when nothing changes.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: TeamId,
        req: UpdateTeamRequest,
    ) -> AppResult<Team> {
        if let Some(name) = &req.name {
            require_text("Team name", name, self.limits.max_name_length)?;
        }
        check_optional_length(
            "Description",
            req.description.as_deref(),
            self.limits.max_text_length,
        )?;

        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_team(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Team {id} not found")))?;

        if let Some(name) = &req.name {
            if let Some(other) = tx.find_team_by_name(name).await? {
                if other.id != id {
                    return Err(AppError::conflict(format!(
                        "Team name '{name}' is already in use"
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

        let (kind, changes) = compute_and_classify(&existing, &proposed);
        let Some(kind) = kind else {
            tx.rollback().await?;
            return Ok(existing);
        };

        proposed.updated_at = self.ledger.clock().utc_now();
        tx.update_team(&proposed).await?;
        let draft = LogDraft::updated(LogSubject::team(id, &proposed.name), kind, changes)?;
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.commit().await?;

        info!(team_id = %id, "Team updated");
        Ok(proposed)
    }

    /// Delete a team. Its projects are kept without a team, and each of
    /// them gets an entry for losing it.
    pub async fn delete(&self, actor: &ActorContext, id: TeamId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_team(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Team {id} not found")))?;

        let now = self.ledger.clock().utc_now();
        let mut drafts = vec![LogDraft::removed(LogSubject::team(id, &existing.name), &existing)];
        let projects = tx.list_team_projects(id).await?;
        for project in &projects {
            let mut detached = project.clone();
            detached.team_id = None;
            detached.updated_at = now;
            let (kind, changes) = compute_and_classify(
                &ProjectAuditView::new(project.clone(), Some(existing.name.clone())),
                &ProjectAuditView::new(detached.clone(), None),
            );
            if let Some(kind) = kind {
                drafts.push(LogDraft::updated(
                    LogSubject::project(project.id, &project.name),
                    kind,
                    changes,
                )?);
            }
            tx.update_project(&detached).await?;
        }

        self.ledger.append(&mut tx, actor, drafts).await?;
        tx.delete_team(id).await?;
        tx.commit().await?;

        info!(
            team_id = %id,
            name = %existing.name,
            projects = projects.len(),
            "Team deleted"
        );
        Ok(())
    }
}
