//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use catalog_core::config::CatalogConfig;
use catalog_core::traits::clock::FixedClock;
use catalog_database::MemoryCatalogStore;

/// Display value sent with every test request.
pub const ADMIN: &str = "admin@example.com";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The store behind the router
    pub store: Arc<MemoryCatalogStore>,
}

impl TestApp {
    /// Create a new test application over an empty store
    pub fn new() -> Self {
        let store = Arc::new(MemoryCatalogStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        ));
        let state = catalog_api::AppState::new(store.clone(), clock, CatalogConfig::default());
        Self {
            router: catalog_api::build_router(state),
            store,
        }
    }

    /// Make an HTTP request as the admin actor
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("x-actor-email", ADMIN)
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST a body and return the created record's id
    pub async fn create(&self, path: &str, body: Value) -> i64 {
        let response = self.request("POST", path, Some(body)).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create failed: {:?}",
            response.body
        );
        response.body["data"]["id"]
            .as_i64()
            .expect("No id in create response")
    }

    /// Rendered log messages for a query string, newest first
    pub async fn messages(&self, query: &str) -> Vec<String> {
        let response = self.request("GET", &format!("/api/logs{query}"), None).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["data"]["items"]
            .as_array()
            .expect("No items in log response")
            .iter()
            .map(|item| item["message"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
