//! # catalog-api
//!
//! HTTP API layer for the catalog built on Axum.
//!
//! Provides the REST endpoints for projects, teams, plugins and users, the
//! audit log query, middleware (request logging, CORS), extractors, DTOs
//! and error mapping. Every route is generic over the
//! [`CatalogStore`](catalog_database::CatalogStore) so the same router runs
//! against PostgreSQL in production and the in-memory store in tests.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::{build_app, build_router};
pub use state::AppState;
