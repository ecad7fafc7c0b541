//! The audit log query endpoint.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{ADMIN, TestApp};

#[tokio::test]
async fn test_search_matches_template_text() {
    let app = TestApp::new();
    let team = app.create("/api/teams", json!({ "name": "Core" })).await;
    app.request(
        "PUT",
        &format!("/api/teams/{team}"),
        Some(json!({ "name": "Platform" })),
    )
    .await;
    app.create("/api/plugins", json!({ "name": "Jira" })).await;

    let messages = app.messages("?search=Updated").await;

    assert_eq!(
        messages,
        vec![format!(
            "{ADMIN} updated team Platform: set TeamName from Core to Platform"
        )]
    );
}

#[tokio::test]
async fn test_pagination_envelope() {
    let app = TestApp::new();
    for name in ["A", "B", "C"] {
        app.create("/api/teams", json!({ "name": name })).await;
    }

    let response = app.request("GET", "/api/logs?page=2&per_page=2", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["total_items"], 3);
    assert_eq!(data["total_pages"], 2);
    assert_eq!(data["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["items"][0]["subject"]["name"], "A");
    assert_eq!(data["items"][0]["event_kind"], "added_team");
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let app = TestApp::new();
    app.create("/api/teams", json!({ "name": "Core" })).await;

    let response = app
        .request("GET", "/api/logs?page=18446744073709551615&per_page=100", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["total_items"], 1);
    assert_eq!(data["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_unknown_kind_is_bad_request() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/logs?kind=exploded", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_actor_headers_are_recorded() {
    let app = TestApp::new();
    let user = app
        .create(
            "/api/users",
            json!({ "email": "ada@example.com", "full_name": "Ada" }),
        )
        .await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/teams")
        .header("Content-Type", "application/json")
        .header("x-actor-id", user.to_string())
        .header("x-actor-email", "ada@example.com")
        .body(axum::body::Body::from(r#"{"name":"Core"}"#))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let logs = app.request("GET", "/api/logs?kind=added_team", None).await;
    let entry = &logs.body["data"]["items"][0];
    assert_eq!(entry["actor_id"], user);
    assert_eq!(entry["actor_display"], "ada@example.com");
    assert_eq!(
        entry["message"],
        "ada@example.com added a new team with properties: TeamName = Core, Description = "
    );
}

#[tokio::test]
async fn test_actor_id_alone_is_credited_by_email() {
    let app = TestApp::new();
    let user = app
        .create(
            "/api/users",
            json!({ "email": "ada@example.com", "full_name": "Ada" }),
        )
        .await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/teams")
        .header("Content-Type", "application/json")
        .header("x-actor-id", user.to_string())
        .body(axum::body::Body::from(r#"{"name":"Core"}"#))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let messages = app.messages("?kind=added_team").await;
    assert_eq!(
        messages,
        vec!["ada@example.com added a new team with properties: TeamName = Core, Description = "]
    );
}
