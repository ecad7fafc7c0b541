//! Team handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use catalog_core::types::id::TeamId;
use catalog_database::CatalogStore;
use catalog_entity::team::Team;

use crate::dto::request::{CreateTeamBody, UpdateTeamBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::state::AppState;

/// POST /api/teams
pub async fn create_team<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Json(body): Json<CreateTeamBody>,
) -> Result<(StatusCode, Json<ApiResponse<Team>>), ApiError> {
    let body = validated(body)?;
    let team = state.teams.create(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(team))))
}

/// PUT /api/teams/{id}
pub async fn update_team<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<TeamId>,
    Json(body): Json<UpdateTeamBody>,
) -> Result<Json<ApiResponse<Team>>, ApiError> {
    let body = validated(body)?;
    let team = state.teams.update(&actor, id, body.into()).await?;
    Ok(Json(ApiResponse::ok(team)))
}

/// DELETE /api/teams/{id}
pub async fn delete_team<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<TeamId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.teams.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "Team {id} deleted"
    )))))
}
