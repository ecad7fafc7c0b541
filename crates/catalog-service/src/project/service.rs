//! Project command handlers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use catalog_audit::{
    AttachmentSnapshot, LogDraft, ProjectAuditView, compute_and_classify, reconcile,
};
use catalog_core::config::CatalogConfig;
use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::actor::ActorContext;
use catalog_core::types::id::{ProjectId, TeamId};
use catalog_database::{CatalogStore, CatalogTransaction};
use catalog_entity::log::{EventKind, LogSubject};
use catalog_entity::project::{
    AttachmentInput, CreateProject, CreateProjectPlugin, Project, ProjectPlugin,
};

use super::attachments::{check_inputs, plugin_label, resolve_plugin_names};
use crate::audit::AuditLedger;
use crate::validation::{check_length, check_optional_length, require_text};

/// Request to create a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Unique project name.
    pub name: String,
    /// Client the project is for.
    pub client_name: String,
    /// Commercial offer reference.
    pub offer_id: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Owning team.
    pub team_id: Option<TeamId>,
    /// Plugins to attach.
    pub plugins: Vec<AttachmentInput>,
}

/// Request to edit a project. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    /// New name.
    pub name: Option<String>,
    /// New client name.
    pub client_name: Option<String>,
    /// New offer reference.
    pub offer_id: Option<String>,
    /// New notes; an empty string clears them.
    pub notes: Option<String>,
    /// New owning team.
    pub team_id: Option<TeamId>,
    /// New archive state.
    pub is_archived: Option<bool>,
    /// The complete new attachment list, when attachments are being edited.
    pub plugins: Option<Vec<AttachmentInput>>,
}

/// A project together with its attachments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetails {
    /// The project record.
    #[serde(flatten)]
    pub project: Project,
    /// Its plugin attachments.
    pub plugins: Vec<ProjectPlugin>,
}

/// Handles project commands.
#[derive(Debug)]
pub struct ProjectService<S: CatalogStore> {
    store: Arc<S>,
    ledger: Arc<AuditLedger>,
    limits: CatalogConfig,
}

impl<S: CatalogStore> Clone for ProjectService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: Arc::clone(&self.ledger),
            limits: self.limits.clone(),
        }
    }
}

fn project_not_found(id: ProjectId) -> AppError {
    AppError::not_found(format!("Project {id} not found"))
}

impl<S: CatalogStore> ProjectService<S> {
    /// Creates a new project service.
    pub fn new(store: Arc<S>, ledger: Arc<AuditLedger>, limits: CatalogConfig) -> Self {
        Self {
            store,
            ledger,
            limits,
        }
    }

    /// Load a project with its attachments.
    pub async fn get(&self, id: ProjectId) -> AppResult<ProjectDetails> {
        let mut tx = self.store.begin().await?;
        let project = tx
            .find_project(id)
            .await?
            .ok_or_else(|| project_not_found(id))?;
        let plugins = tx.list_project_plugins(id).await?;
        tx.rollback().await?;
        Ok(ProjectDetails { project, plugins })
    }

    /// Create a project and its initial attachments.
    pub async fn create(
        &self,
        actor: &ActorContext,
        req: CreateProjectRequest,
    ) -> AppResult<ProjectDetails> {
        require_text("Project name", &req.name, self.limits.max_name_length)?;
        check_length("Client name", &req.client_name, self.limits.max_name_length)?;
        check_length("Offer id", &req.offer_id, self.limits.max_name_length)?;
        check_optional_length("Notes", req.notes.as_deref(), self.limits.max_notes_length)?;
        check_inputs(&req.plugins, &self.limits)?;

        let mut tx = self.store.begin().await?;

        if tx.find_project_by_name(&req.name).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Project name '{}' is already in use",
                req.name
            )));
        }
        if let Some(team_id) = req.team_id {
            ensure_team(&mut tx, team_id).await?;
        }
        let names =
            resolve_plugin_names(&mut tx, req.plugins.iter().map(|p| p.plugin_id), []).await?;

        let now = self.ledger.clock().utc_now();
        let project = tx
            .insert_project(
                &CreateProject {
                    name: req.name,
                    client_name: req.client_name,
                    offer_id: req.offer_id,
                    notes: req.notes,
                    team_id: req.team_id,
                },
                now,
            )
            .await?;
        let subject = LogSubject::project(project.id, &project.name);

        let view = audit_view(&mut tx, &project).await?;
        let mut drafts = vec![LogDraft::created(subject.clone(), &view)];
        let mut plugins = Vec::with_capacity(req.plugins.len());
        for input in req.plugins {
            let attachment = tx
                .insert_project_plugin(&CreateProjectPlugin {
                    project_id: project.id,
                    plugin_id: input.plugin_id,
                    url: input.url,
                    display_name: input.display_name,
                })
                .await?;
            let snapshot =
                AttachmentSnapshot::of(&attachment, plugin_label(&names, attachment.plugin_id));
            drafts.push(LogDraft::created(subject.clone(), &snapshot));
            plugins.push(attachment);
        }

        self.ledger.append(&mut tx, actor, drafts).await?;
        tx.commit().await?;

        info!(
            project_id = %project.id,
            name = %project.name,
            plugins = plugins.len(),
            actor = %actor.current_actor_display(),
            "Project created"
        );
        Ok(ProjectDetails { project, plugins })
    }

    /// Apply an edit.
    ///
    /// Writes and logs nothing when the request changes nothing.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: ProjectId,
        req: UpdateProjectRequest,
    ) -> AppResult<ProjectDetails> {
        if let Some(name) = &req.name {
            require_text("Project name", name, self.limits.max_name_length)?;
        }
        check_optional_length(
            "Client name",
            req.client_name.as_deref(),
            self.limits.max_name_length,
        )?;
        check_optional_length("Offer id", req.offer_id.as_deref(), self.limits.max_name_length)?;
        check_optional_length("Notes", req.notes.as_deref(), self.limits.max_notes_length)?;
        if let Some(plugins) = &req.plugins {
            check_inputs(plugins, &self.limits)?;
        }

        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_project(id)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        if let Some(name) = &req.name {
            if let Some(other) = tx.find_project_by_name(name).await? {
                if other.id != id {
                    return Err(AppError::conflict(format!(
                        "Project name '{name}' is already in use"
                    )));
                }
            }
        }
        if let Some(team_id) = req.team_id {
            ensure_team(&mut tx, team_id).await?;
        }

        let mut proposed = existing.clone();
        if let Some(name) = req.name {
            proposed.name = name;
        }
        if let Some(client_name) = req.client_name {
            proposed.client_name = client_name;
        }
        if let Some(offer_id) = req.offer_id {
            proposed.offer_id = offer_id;
        }
        if let Some(notes) = req.notes {
            proposed.notes = Some(notes).filter(|n| !n.is_empty());
        }
        if let Some(team_id) = req.team_id {
            proposed.team_id = Some(team_id);
        }
        if let Some(is_archived) = req.is_archived {
            proposed.is_archived = is_archived;
        }

        let (kind, changes) = compute_and_classify(
            &audit_view(&mut tx, &existing).await?,
            &audit_view(&mut tx, &proposed).await?,
        );

        let current = tx.list_project_plugins(id).await?;
        let reconciliation = req.plugins.map(|inputs| {
            let incoming = inputs
                .into_iter()
                .map(|input| input.into_attachment(id))
                .collect();
            reconcile(current.clone(), incoming, ProjectPlugin::key)
        });

        let attachments_changed = reconciliation.as_ref().is_some_and(|r| !r.is_noop());
        let names = match &reconciliation {
            Some(r) => {
                resolve_plugin_names(
                    &mut tx,
                    r.added.iter().map(|a| a.plugin_id),
                    r.removed.iter().map(|a| a.plugin_id),
                )
                .await?
            }
            None => Default::default(),
        };

        if kind.is_none() && !attachments_changed {
            tx.rollback().await?;
            info!(project_id = %id, "Project update changed nothing");
            return Ok(ProjectDetails {
                project: existing,
                plugins: current,
            });
        }

        proposed.updated_at = self.ledger.clock().utc_now();
        tx.update_project(&proposed).await?;

        let subject = LogSubject::project(id, &proposed.name);
        let mut drafts = Vec::new();
        if let Some(kind) = kind {
            drafts.push(LogDraft::updated(subject.clone(), kind, changes)?);
        }

        if let Some(r) = reconciliation {
            for pair in r.updated() {
                let mut attachment = pair.existing.clone();
                attachment.url = pair.incoming.url.clone();
                attachment.display_name = pair.incoming.display_name.clone();
                tx.update_project_plugin(&attachment).await?;
                drafts.push(LogDraft::updated(
                    subject.clone(),
                    EventKind::UpdatedProjectPlugin,
                    pair.changes.clone(),
                )?);
            }
            for added in r.added {
                let attachment = tx
                    .insert_project_plugin(&CreateProjectPlugin {
                        project_id: id,
                        plugin_id: added.plugin_id,
                        url: added.url,
                        display_name: added.display_name,
                    })
                    .await?;
                let snapshot =
                    AttachmentSnapshot::of(&attachment, plugin_label(&names, attachment.plugin_id));
                drafts.push(LogDraft::created(subject.clone(), &snapshot));
            }
            for removed in r.removed {
                tx.delete_project_plugin(removed.id).await?;
                let snapshot =
                    AttachmentSnapshot::of(&removed, plugin_label(&names, removed.plugin_id));
                drafts.push(LogDraft::removed(subject.clone(), &snapshot));
            }
        }

        let entries = drafts.len();
        self.ledger.append(&mut tx, actor, drafts).await?;
        let plugins = tx.list_project_plugins(id).await?;
        tx.commit().await?;

        info!(
            project_id = %id,
            kind = ?kind,
            entries,
            actor = %actor.current_actor_display(),
            "Project updated"
        );
        Ok(ProjectDetails {
            project: proposed,
            plugins,
        })
    }

    /// Raise or clear the archive flag.
    pub async fn set_archived(
        &self,
        actor: &ActorContext,
        id: ProjectId,
        archived: bool,
    ) -> AppResult<Project> {
        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_project(id)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        let mut proposed = existing.clone();
        proposed.is_archived = archived;
        let old = audit_view(&mut tx, &existing).await?;
        let new = ProjectAuditView::new(proposed.clone(), old.team.clone());
        let (kind, changes) = compute_and_classify(&old, &new);
        let Some(kind) = kind else {
            tx.rollback().await?;
            return Ok(existing);
        };

        proposed.updated_at = self.ledger.clock().utc_now();
        tx.update_project(&proposed).await?;
        let draft = LogDraft::updated(LogSubject::project(id, &proposed.name), kind, changes)?;
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.commit().await?;

        info!(project_id = %id, archived, "Project archive state changed");
        Ok(proposed)
    }

    /// Delete a project together with its attachments.
    ///
    /// Only the project's own removal is logged.
    pub async fn delete(&self, actor: &ActorContext, id: ProjectId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let existing = tx
            .find_project(id)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        let view = audit_view(&mut tx, &existing).await?;
        let draft = LogDraft::removed(LogSubject::project(id, &existing.name), &view);
        self.ledger.append(&mut tx, actor, vec![draft]).await?;
        tx.delete_project(id).await?;
        tx.commit().await?;

        info!(project_id = %id, name = %existing.name, "Project deleted");
        Ok(())
    }
}

/// The project together with its team's current name.
pub(crate) async fn audit_view<T: CatalogTransaction>(
    tx: &mut T,
    project: &Project,
) -> AppResult<ProjectAuditView> {
    let team = match project.team_id {
        Some(team_id) => tx.find_team(team_id).await?.map(|t| t.name),
        None => None,
    };
    Ok(ProjectAuditView::new(project.clone(), team))
}

async fn ensure_team<T: CatalogTransaction>(tx: &mut T, id: TeamId) -> AppResult<()> {
    match tx.find_team(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(format!("Team {id} not found"))),
    }
}
