//! Project handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use catalog_core::types::id::ProjectId;
use catalog_database::CatalogStore;
use catalog_entity::project::Project;
use catalog_service::ProjectDetails;

use crate::dto::request::{CreateProjectBody, UpdateProjectBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::state::AppState;

/// GET /api/projects/{id}
pub async fn get_project<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ApiResponse<ProjectDetails>>, ApiError> {
    let details = state.projects.get(id).await?;
    Ok(Json(ApiResponse::ok(details)))
}

/// POST /api/projects
pub async fn create_project<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectDetails>>), ApiError> {
    let body = validated(body)?;
    let details = state.projects.create(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(details))))
}

/// PUT /api/projects/{id}
pub async fn update_project<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<ProjectId>,
    Json(body): Json<UpdateProjectBody>,
) -> Result<Json<ApiResponse<ProjectDetails>>, ApiError> {
    let body = validated(body)?;
    let details = state.projects.update(&actor, id, body.into()).await?;
    Ok(Json(ApiResponse::ok(details)))
}

/// POST /api/projects/{id}/archive
pub async fn archive_project<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<ProjectId>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state.projects.set_archived(&actor, id, true).await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// POST /api/projects/{id}/unarchive
pub async fn unarchive_project<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<ProjectId>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state.projects.set_archived(&actor, id, false).await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// DELETE /api/projects/{id}
pub async fn delete_project<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<ProjectId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.projects.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "Project {id} deleted"
    )))))
}
