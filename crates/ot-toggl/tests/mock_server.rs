//! Integration tests for the Toggl client against a local mock server.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use ot_core::TimeEntrySummary;
use ot_toggl::{Client, TogglError, Workspace};
use serde_json::{Value, json};

/// `test-token:api_token`, base64-encoded.
const EXPECTED_AUTH: &str = "Basic dGVzdC10b2tlbjphcGlfdG9rZW4=";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(EXPECTED_AUTH)
}

async fn workspaces(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!("Incorrect username and/or password")),
        );
    }
    (
        StatusCode::OK,
        Json(json!([
            {"id": 1001, "name": "Personal", "premium": false},
            {"id": 2002, "name": "Acme", "premium": true}
        ])),
    )
}

async fn summary(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!("Incorrect username and/or password")),
        );
    }
    if params.get("workspace_id").map(String::as_str) != Some("1001") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"message": "unknown workspace"}})),
        );
    }
    // Echo the requested period back through the project names so tests can
    // check the query parameters.
    let since = params.get("since").cloned().unwrap_or_default();
    let until = params.get("until").cloned().unwrap_or_default();
    let agent = params.get("user_agent").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "total_grand": 12_600_000,
            "data": [
                {"title": {"project": "Work"}, "time": 9_000_000},
                {"title": {"project": format!("{since}/{until}/{agent}")}, "time": 0},
                {"title": {"project": null}, "time": 3_600_000}
            ]
        })),
    )
}

async fn spawn_server() -> String {
    let router = Router::new()
        .route("/api/v9/me/workspaces", get(workspaces))
        .route("/reports/api/v2/summary", get(summary));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_lists_workspaces_with_basic_auth() {
    let url = spawn_server().await;
    let client = Client::with_base_url("test-token", url).unwrap();

    let workspaces = client.workspaces().await.unwrap();

    assert_eq!(
        workspaces,
        vec![
            Workspace {
                id: 1001,
                name: "Personal".to_string()
            },
            Workspace {
                id: 2002,
                name: "Acme".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_wrong_token_is_api_error() {
    let url = spawn_server().await;
    let client = Client::with_base_url("other-token", url).unwrap();

    let err = client.workspaces().await.unwrap_err();

    assert!(matches!(
        err,
        TogglError::Api { status: 403, ref message } if message == "Incorrect username and/or password"
    ));
}

#[tokio::test]
async fn test_summary_report_sends_period_and_maps_entries() {
    let url = spawn_server().await;
    let client = Client::with_base_url("test-token", url).unwrap();

    let entries = client
        .summary_report(1001, date(2025, 1, 1), date(2025, 1, 31))
        .await
        .unwrap();

    assert_eq!(
        entries,
        vec![
            TimeEntrySummary::new("Work", 9_000_000),
            TimeEntrySummary::new("2025-01-01/2025-01-31/toggl-overtime", 0),
            TimeEntrySummary::new("", 3_600_000),
        ]
    );
}

#[tokio::test]
async fn test_summary_report_error_message_is_decoded() {
    let url = spawn_server().await;
    let client = Client::with_base_url("test-token", url).unwrap();

    let err = client
        .summary_report(9999, date(2025, 1, 1), date(2025, 1, 31))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "API error (status 400): unknown workspace");
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    // Bind and drop a listener to get a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = Client::with_base_url("test-token", format!("http://{addr}")).unwrap();

    let err = client.workspaces().await.unwrap_err();

    assert!(matches!(err, TogglError::Request(_)));
}
