//! Global plugin handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use catalog_core::types::id::PluginId;
use catalog_database::CatalogStore;
use catalog_entity::plugin::GlobalPlugin;

use crate::dto::request::{CreatePluginBody, UpdatePluginBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::state::AppState;

/// POST /api/plugins
pub async fn create_plugin<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Json(body): Json<CreatePluginBody>,
) -> Result<(StatusCode, Json<ApiResponse<GlobalPlugin>>), ApiError> {
    let body = validated(body)?;
    let plugin = state.plugins.create(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(plugin))))
}

/// PUT /api/plugins/{id}
pub async fn update_plugin<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<PluginId>,
    Json(body): Json<UpdatePluginBody>,
) -> Result<Json<ApiResponse<GlobalPlugin>>, ApiError> {
    let body = validated(body)?;
    let plugin = state.plugins.update(&actor, id, body.into()).await?;
    Ok(Json(ApiResponse::ok(plugin)))
}

/// POST /api/plugins/{id}/archive
pub async fn archive_plugin<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<PluginId>,
) -> Result<Json<ApiResponse<GlobalPlugin>>, ApiError> {
    let plugin = state.plugins.set_archived(&actor, id, true).await?;
    Ok(Json(ApiResponse::ok(plugin)))
}

/// POST /api/plugins/{id}/unarchive
pub async fn unarchive_plugin<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<PluginId>,
) -> Result<Json<ApiResponse<GlobalPlugin>>, ApiError> {
    let plugin = state.plugins.set_archived(&actor, id, false).await?;
    Ok(Json(ApiResponse::ok(plugin)))
}

/// DELETE /api/plugins/{id}
pub async fn delete_plugin<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<PluginId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.plugins.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "Plugin {id} deleted"
    )))))
}
