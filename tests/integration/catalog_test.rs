//! Team, plugin and user endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{ADMIN, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_team_rename_is_logged() {
    let app = TestApp::new();
    let team = app.create("/api/teams", json!({ "name": "Core" })).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/teams/{team}"),
            Some(json!({ "name": "Platform", "description": "Shared services" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let messages = app.messages(&format!("?team_id={team}")).await;
    assert_eq!(
        messages[0],
        format!(
            "{ADMIN} updated team Platform: set TeamName from Core to Platform, \
             set Description to Shared services"
        )
    );
}

#[tokio::test]
async fn test_attached_plugin_cannot_be_deleted() {
    let app = TestApp::new();
    let jira = app.create("/api/plugins", json!({ "name": "Jira" })).await;
    app.create(
        "/api/projects",
        json!({
            "name": "Apollo",
            "plugins": [{ "plugin_id": jira, "url": "https://jira", "display_name": "" }]
        }),
    )
    .await;

    let response = app
        .request("DELETE", &format!("/api/plugins/{jira}"), None)
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "Plugin 'Jira' is still attached to 1 project(s)"
    );
}

#[tokio::test]
async fn test_plugin_archive_cycle() {
    let app = TestApp::new();
    let jira = app.create("/api/plugins", json!({ "name": "Jira" })).await;

    app.request("POST", &format!("/api/plugins/{jira}/archive"), None)
        .await;
    app.request("POST", &format!("/api/plugins/{jira}/unarchive"), None)
        .await;
    app.request("DELETE", &format!("/api/plugins/{jira}"), None)
        .await;

    let messages = app.messages("").await;
    assert_eq!(
        messages,
        vec![
            format!("{ADMIN} removed plugin Jira"),
            format!("{ADMIN} unarchived plugin Jira"),
            format!("{ADMIN} archived plugin Jira"),
            format!("{ADMIN} added a new plugin with properties: PluginName = Jira, Description = , IsArchived = False"),
        ]
    );
}

#[tokio::test]
async fn test_user_password_never_leaks() {
    let app = TestApp::new();
    let user = app
        .create(
            "/api/users",
            json!({
                "email": "ada@example.com",
                "full_name": "Ada Lovelace",
                "role": "member",
                "password": "first-secret"
            }),
        )
        .await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{user}"),
            Some(json!({ "password": "second-secret" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].get("password_hash").is_none());
    let messages = app.messages(&format!("?user_id={user}")).await;
    assert_eq!(
        messages[0],
        format!("{ADMIN} updated user ada@example.com: changed Password")
    );
    assert!(messages.iter().all(|m| !m.contains("secret")));
}

#[tokio::test]
async fn test_invalid_user_body_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "email": "not-an-email", "full_name": "Ada" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_team_is_not_found() {
    let app = TestApp::new();

    let response = app
        .request("PUT", "/api/teams/42", Some(json!({ "name": "Core" })))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Team 42 not found");
}
