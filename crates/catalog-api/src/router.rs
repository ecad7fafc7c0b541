//! Route definitions for the catalog HTTP API.
//!
//! All routes are mounted under `/api` and receive `AppState<S>` through
//! Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use catalog_database::CatalogStore;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with its state attached.
pub fn build_router<S: CatalogStore>(state: AppState<S>) -> Router {
    let api_routes = Router::new()
        .merge(project_routes())
        .merge(team_routes())
        .merge(plugin_routes())
        .merge(user_routes())
        .merge(log_routes())
        .route("/health", get(handlers::health::health::<S>));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Builds the complete application: routes, tracing, request logging and
/// CORS for `allowed_origins`.
pub fn build_app<S: CatalogStore>(state: AppState<S>, allowed_origins: &[String]) -> Router {
    build_router(state).layer(middleware::cors::build_cors_layer(allowed_origins))
}

fn project_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/projects", post(handlers::project::create_project::<S>))
        .route(
            "/projects/{id}",
            get(handlers::project::get_project::<S>)
                .put(handlers::project::update_project::<S>)
                .delete(handlers::project::delete_project::<S>),
        )
        .route(
            "/projects/{id}/archive",
            post(handlers::project::archive_project::<S>),
        )
        .route(
            "/projects/{id}/unarchive",
            post(handlers::project::unarchive_project::<S>),
        )
}

fn team_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/teams", post(handlers::team::create_team::<S>))
        .route(
            "/teams/{id}",
            put(handlers::team::update_team::<S>).delete(handlers::team::delete_team::<S>),
        )
}

fn plugin_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/plugins", post(handlers::plugin::create_plugin::<S>))
        .route(
            "/plugins/{id}",
            put(handlers::plugin::update_plugin::<S>)
                .delete(handlers::plugin::delete_plugin::<S>),
        )
        .route(
            "/plugins/{id}/archive",
            post(handlers::plugin::archive_plugin::<S>),
        )
        .route(
            "/plugins/{id}/unarchive",
            post(handlers::plugin::unarchive_plugin::<S>),
        )
}

fn user_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/users", post(handlers::user::create_user::<S>))
        .route(
            "/users/{id}",
            put(handlers::user::update_user::<S>).delete(handlers::user::delete_user::<S>),
        )
}

fn log_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new().route("/logs", get(handlers::log::search_logs::<S>))
}
