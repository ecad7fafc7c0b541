//! User handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use catalog_core::types::id::UserId;
use catalog_database::CatalogStore;
use catalog_entity::user::User;

use crate::dto::request::{CreateUserBody, UpdateUserBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::state::AppState;

/// POST /api/users
pub async fn create_user<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let body = validated(body)?;
    let user = state.users.create(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// PUT /api/users/{id}
pub async fn update_user<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let body = validated(body)?;
    let user = state.users.update(&actor, id, body.into()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user<S: CatalogStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.users.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "User {id} deleted"
    )))))
}
