//! Audit log handler.

use axum::Json;
use axum::extract::{Query, State};

use catalog_core::types::pagination::PageResponse;
use catalog_database::CatalogStore;
use catalog_service::RenderedLogEntry;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::LogParams;
use crate::state::AppState;

/// GET /api/logs
pub async fn search_logs<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Query(params): Query<LogParams>,
) -> Result<Json<ApiResponse<PageResponse<RenderedLogEntry>>>, ApiError> {
    let (query, page) = params.into_query()?;
    let result = state.logs.query(&query, page).await?;
    Ok(Json(ApiResponse::ok(result)))
}
