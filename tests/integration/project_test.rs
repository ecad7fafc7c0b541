//! Project endpoints and the history they leave behind.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{ADMIN, TestApp};

async fn seed(app: &TestApp) -> (i64, i64) {
    let jira = app.create("/api/plugins", json!({ "name": "Jira" })).await;
    let project = app
        .create(
            "/api/projects",
            json!({
                "name": "Apollo",
                "client_name": "Acme",
                "offer_id": "Offer A",
                "notes": "Kickoff in May",
                "plugins": [
                    { "plugin_id": jira, "url": "https://jira/a", "display_name": "Tracker" }
                ]
            }),
        )
        .await;
    (jira, project)
}

#[tokio::test]
async fn test_create_logs_project_and_attachments() {
    let app = TestApp::new();
    let (_, project) = seed(&app).await;

    let messages = app.messages(&format!("?project_id={project}")).await;

    assert_eq!(
        messages,
        vec![
            format!(
                "{ADMIN} added a new plugin to project Apollo with properties: \
                 Plugin = Jira, Url = https://jira/a, DisplayName = Tracker"
            ),
            format!(
                "{ADMIN} added a new project with properties: ProjectName = Apollo, \
                 ClientName = Acme, OfferId = Offer A, Notes = Kickoff in May, Team = , IsArchived = False"
            ),
        ]
    );
}

#[tokio::test]
async fn test_scalar_edit_logs_only_changed_fields() {
    let app = TestApp::new();
    let (_, project) = seed(&app).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/projects/{project}"),
            Some(json!({
                "client_name": "Globex",
                "offer_id": "Updated Offer",
                "notes": "Kickoff in May"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["client_name"], "Globex");
    let messages = app.messages("?kind=updated_project").await;
    assert_eq!(
        messages,
        vec![format!(
            "{ADMIN} updated project Apollo: set ClientName from Acme to Globex, \
             set OfferId from Offer A to Updated Offer"
        )]
    );
}

#[tokio::test]
async fn test_attachment_rename_and_removal() {
    let app = TestApp::new();
    let (jira, project) = seed(&app).await;

    app.request(
        "PUT",
        &format!("/api/projects/{project}"),
        Some(json!({
            "plugins": [
                { "plugin_id": jira, "url": "https://jira/a", "display_name": "Issues" }
            ]
        })),
    )
    .await;
    app.request(
        "PUT",
        &format!("/api/projects/{project}"),
        Some(json!({ "plugins": [] })),
    )
    .await;

    let messages = app.messages(&format!("?project_id={project}")).await;
    assert_eq!(
        messages[0],
        format!(
            "{ADMIN} removed a plugin from project Apollo with properties: \
             Plugin = Jira, Url = https://jira/a, DisplayName = Issues"
        )
    );
    assert_eq!(
        messages[1],
        format!(
            "{ADMIN} updated a plugin of project Apollo: set DisplayName from Tracker to Issues"
        )
    );
}

#[tokio::test]
async fn test_unknown_plugin_rejects_whole_edit() {
    let app = TestApp::new();
    let (_, project) = seed(&app).await;
    let before = app.store.log_count().await;

    let response = app
        .request(
            "PUT",
            &format!("/api/projects/{project}"),
            Some(json!({
                "client_name": "Globex",
                "plugins": [
                    { "plugin_id": 100, "url": "https://x", "display_name": "X" },
                    { "plugin_id": 99, "url": "https://y", "display_name": "Y" }
                ]
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Plugins not found: 99, 100");
    assert_eq!(app.store.log_count().await, before);

    let current = app.request("GET", &format!("/api/projects/{project}"), None).await;
    assert_eq!(current.body["data"]["client_name"], "Acme");
    assert_eq!(current.body["data"]["plugins"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_noop_edit_logs_nothing() {
    let app = TestApp::new();
    let (_, project) = seed(&app).await;
    let before = app.store.log_count().await;

    let response = app
        .request(
            "PUT",
            &format!("/api/projects/{project}"),
            Some(json!({ "client_name": "Acme", "offer_id": "Offer A" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.store.log_count().await, before);
}

#[tokio::test]
async fn test_archive_and_unarchive() {
    let app = TestApp::new();
    let (_, project) = seed(&app).await;

    let archived = app
        .request("POST", &format!("/api/projects/{project}/archive"), None)
        .await;
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.body["data"]["is_archived"], true);
    app.request("POST", &format!("/api/projects/{project}/unarchive"), None)
        .await;

    let messages = app.messages(&format!("?project_id={project}")).await;
    assert_eq!(messages[0], format!("{ADMIN} unarchived project Apollo"));
    assert_eq!(messages[1], format!("{ADMIN} archived project Apollo"));
}

#[tokio::test]
async fn test_ledger_failure_rolls_back_edit() {
    let app = TestApp::new();
    let (_, project) = seed(&app).await;
    app.store.fail_log_writes(true);

    let response = app
        .request(
            "PUT",
            &format!("/api/projects/{project}"),
            Some(json!({ "client_name": "Globex" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    app.store.fail_log_writes(false);
    let current = app.request("GET", &format!("/api/projects/{project}"), None).await;
    assert_eq!(current.body["data"]["client_name"], "Acme");
}

#[tokio::test]
async fn test_duplicate_name_is_conflict() {
    let app = TestApp::new();
    seed(&app).await;

    let response = app
        .request("POST", "/api/projects", Some(json!({ "name": "apollo" })))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_oversized_notes_are_rejected() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/projects",
            Some(json!({ "name": "Apollo", "notes": "x".repeat(5000) })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        "Notes is 5000 chars long, maximum allowed 4000"
    );
}

#[tokio::test]
async fn test_deleted_project_history_stays_readable() {
    let app = TestApp::new();
    let (_, project) = seed(&app).await;

    let response = app
        .request("DELETE", &format!("/api/projects/{project}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let missing = app.request("GET", &format!("/api/projects/{project}"), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let messages = app.messages("?search=apollo").await;
    assert_eq!(messages[0], format!("{ADMIN} removed project Apollo"));
    assert!(messages.len() >= 3);
}

#[tokio::test]
async fn test_team_move_is_logged() {
    let app = TestApp::new();
    let (_, project) = seed(&app).await;
    let team = app.create("/api/teams", json!({ "name": "Core" })).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/projects/{project}"),
            Some(json!({ "team_id": team })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let messages = app.messages(&format!("?project_id={project}&kind=updated_project")).await;
    assert_eq!(
        messages,
        vec![format!("{ADMIN} updated project Apollo: set Team to Core")]
    );
}
