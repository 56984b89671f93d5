//! Integration tests for the JIRA client against the in-process mock tracker.
//!
//! These cover the full status mapping for both operations, the shape of
//! what actually goes over the wire, and deadline handling.

use jiragate::testing::{MockResponse, MockTracker};
use jiragate::{
    ClientSettings, Credentials, IssueCreationRequest, IssueKey, JiraClient, TrackerError,
};
use rstest::rstest;
use serde_json::json;
use std::time::{Duration, Instant};

mod helpers {
    use super::*;

    pub fn client() -> JiraClient {
        JiraClient::new(ClientSettings::default()).expect("client should build")
    }

    pub fn fast_client() -> JiraClient {
        JiraClient::new(ClientSettings {
            fetch_timeout: Duration::from_millis(200),
            create_timeout: Duration::from_millis(200),
        })
        .expect("client should build")
    }

    pub fn credentials(mock: &MockTracker) -> Credentials {
        Credentials::new(mock.base_url(), "dev@acme.io", "api-token")
    }

    pub async fn fetch_mock(response: MockResponse) -> MockTracker {
        MockTracker::for_fetch(response)
            .await
            .expect("mock tracker should start")
    }

    pub async fn create_mock(response: MockResponse) -> MockTracker {
        MockTracker::for_create(response)
            .await
            .expect("mock tracker should start")
    }
}

use helpers::*;

// =============================================================================
// fetch
// =============================================================================

#[tokio::test]
async fn test_fetch_success_without_assignee() {
    let mock = fetch_mock(MockResponse::json(
        200,
        json!({"key": "KAN-2", "fields": {"summary": "Fix bug", "status": {"name": "Open"}}}),
    ))
    .await;

    let outcome = client().fetch_issue(&credentials(&mock), "KAN-2").await;

    assert!(outcome.is_success(), "unexpected failure: {outcome}");
    for expected in ["KAN-2", "Fix bug", "Open", "Unassigned"] {
        assert!(outcome.text().contains(expected), "missing {expected}: {outcome}");
    }
}

#[tokio::test]
async fn test_fetch_success_with_assignee() {
    let mock = fetch_mock(MockResponse::json(
        200,
        json!({
            "key": "KAN-3",
            "fields": {
                "summary": "Ship it",
                "status": {"name": "In Progress"},
                "assignee": {"displayName": "Grace Hopper"}
            }
        }),
    ))
    .await;

    let summary = client()
        .issue_summary(&credentials(&mock), &IssueKey::new("KAN-3").unwrap())
        .await
        .expect("fetch should succeed");

    assert_eq!(summary.key, "KAN-3");
    assert_eq!(summary.status, "In Progress");
    assert_eq!(summary.assignee_name, "Grace Hopper");
}

#[tokio::test]
async fn test_fetch_sends_expected_request() {
    let mock = fetch_mock(MockResponse::json(200, json!({"key": "KAN-2"}))).await;
    let creds = Credentials::new(format!("{}/", mock.base_url()), "dev@acme.io", "api-token");

    client().fetch_issue(&creds, "KAN-2").await;

    let request = mock.last_request().expect("one request");
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/rest/api/3/issue/KAN-2");
    assert!(request
        .authorization
        .as_deref()
        .is_some_and(|auth| auth.starts_with("Basic ")));
}

#[rstest]
#[case::query("KAN-2?expand=changelog", "/rest/api/3/issue/KAN-2%3Fexpand=changelog")]
#[case::fragment("KAN-2#comments", "/rest/api/3/issue/KAN-2%23comments")]
#[case::slash("KAN/2", "/rest/api/3/issue/KAN%2F2")]
#[tokio::test]
async fn test_fetch_key_stays_one_path_segment(#[case] key: &str, #[case] expected_path: &str) {
    let mock = fetch_mock(MockResponse::json(200, json!({"key": "KAN-2"}))).await;

    client().fetch_issue(&credentials(&mock), key).await;

    assert_eq!(mock.hits(), 1);
    assert_eq!(mock.last_request().expect("one request").path, expected_path);
}

#[tokio::test]
async fn test_fetch_with_unusable_base_url_fails() {
    let creds = Credentials::new("acme.atlassian.net", "dev@acme.io", "api-token");

    let outcome = client().fetch_issue(&creds, "KAN-2").await;

    assert!(!outcome.is_success());
    assert!(outcome.text().contains("Invalid JIRA URL"), "got: {outcome}");
}

#[rstest]
#[case::not_found(MockResponse::text(404, ""), "not found")]
#[case::unauthorized(MockResponse::text(401, ""), "authentication failed")]
#[case::server_error(MockResponse::text(500, "boom"), "JIRA error 500: boom")]
#[case::forbidden(MockResponse::text(403, "nope"), "JIRA error 403: nope")]
#[tokio::test]
async fn test_fetch_failures(#[case] response: MockResponse, #[case] expected: &str) {
    let mock = fetch_mock(response).await;

    let outcome = client().fetch_issue(&credentials(&mock), "KAN-2").await;

    assert!(!outcome.is_success());
    assert!(outcome.text().starts_with('❌'));
    assert!(outcome.text().contains(expected), "got: {outcome}");
}

#[tokio::test]
async fn test_fetch_error_body_is_truncated_to_200_chars() {
    let mock = fetch_mock(MockResponse::text(502, "x".repeat(500))).await;

    let err = client()
        .issue_summary(&credentials(&mock), &IssueKey::new("KAN-2").unwrap())
        .await
        .unwrap_err();

    match err {
        TrackerError::Status { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body.chars().count(), 200);
        }
        other => panic!("Expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_unparseable_body_is_unexpected_error() {
    let mock = fetch_mock(MockResponse::text(200, "<html>login</html>")).await;

    let outcome = client().fetch_issue(&credentials(&mock), "KAN-2").await;

    assert!(!outcome.is_success());
    assert!(outcome.text().contains("Unexpected error"), "got: {outcome}");
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock = fetch_mock(MockResponse::Hang).await;

    let started = Instant::now();
    let outcome = fast_client().fetch_issue(&credentials(&mock), "KAN-2").await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!outcome.is_success());
    assert!(outcome.text().to_lowercase().contains("timeout"), "got: {outcome}");
}

#[tokio::test]
async fn test_fetch_unreachable_server() {
    let base_url = {
        let mock = fetch_mock(MockResponse::Hang).await;
        mock.base_url().to_string()
    };
    // Give the aborted listener a moment to release the port.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let creds = Credentials::new(base_url, "dev@acme.io", "api-token");
    let outcome = fast_client().fetch_issue(&creds, "KAN-2").await;

    assert!(!outcome.is_success());
}

// =============================================================================
// create
// =============================================================================

#[tokio::test]
async fn test_create_success() {
    let mock = create_mock(MockResponse::json(201, json!({"key": "KAN-9", "id": "10009"}))).await;
    let request = IssueCreationRequest::new("KAN", "New login page", "Build it");

    let outcome = client().create_issue(&credentials(&mock), &request).await;

    assert!(outcome.is_success(), "unexpected failure: {outcome}");
    assert!(outcome.text().contains("KAN-9"));
    assert!(outcome
        .text()
        .contains(&format!("{}/browse/KAN-9", mock.base_url())));
    assert!(outcome.text().contains("New login page"));
    assert!(outcome.text().contains("Task"));
}

#[tokio::test]
async fn test_create_accepts_200() {
    let mock = create_mock(MockResponse::json(200, json!({"key": "KAN-10"}))).await;
    let request = IssueCreationRequest::new("KAN", "Title", "Body").with_issue_type("Bug");

    let created = client()
        .submit_issue(&credentials(&mock), &request)
        .await
        .expect("create should succeed");

    assert_eq!(created.key, "KAN-10");
    assert!(created.browse_url.ends_with("/browse/KAN-10"));
    assert_eq!(created.issue_type, "Bug");
}

#[tokio::test]
async fn test_create_sends_expected_payload() {
    let mock = create_mock(MockResponse::json(201, json!({"key": "KAN-9"}))).await;
    let request = IssueCreationRequest::new("KAN", "Title", "Line one")
        .with_issue_type("Story")
        .with_labels(vec!["backend".into()])
        .with_assignee_email("dev@acme.io");

    client().create_issue(&credentials(&mock), &request).await;

    let sent = mock.last_request().expect("one request");
    assert_eq!(sent.method, "POST");
    assert_eq!(sent.path, "/rest/api/3/issue");
    assert_eq!(sent.content_type.as_deref(), Some("application/json"));

    let body = sent.json().expect("JSON body");
    assert_eq!(body["fields"]["project"]["key"], "KAN");
    assert_eq!(body["fields"]["issuetype"]["name"], "Story");
    assert_eq!(
        body["fields"]["description"]["content"][0]["content"][0]["text"],
        "Line one"
    );
    assert_eq!(body["fields"]["labels"], json!(["backend"]));
    assert!(body["fields"].get("assignee").is_none());
}

#[tokio::test]
async fn test_create_rejected() {
    let mock = create_mock(MockResponse::text(
        400,
        r#"{"errors":{"project":"valid project is required"}}"#,
    ))
    .await;
    let request = IssueCreationRequest::new("NOPE", "Title", "Body");

    let outcome = client().create_issue(&credentials(&mock), &request).await;

    assert!(!outcome.is_success());
    assert!(outcome.text().contains("400"));
    assert!(outcome.text().contains("valid project is required"));
}

#[tokio::test]
async fn test_create_error_body_is_truncated_to_300_chars() {
    let mock = create_mock(MockResponse::text(422, "é".repeat(1000))).await;
    let request = IssueCreationRequest::new("KAN", "Title", "Body");

    let err = client()
        .submit_issue(&credentials(&mock), &request)
        .await
        .unwrap_err();

    match err {
        TrackerError::Rejected { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body.chars().count(), 300);
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_timeout() {
    let mock = create_mock(MockResponse::Hang).await;
    let request = IssueCreationRequest::new("KAN", "Title", "Body");

    let outcome = fast_client().create_issue(&credentials(&mock), &request).await;

    assert!(!outcome.is_success());
    assert!(outcome.text().contains("Timeout while creating issue"), "got: {outcome}");
}

#[tokio::test]
async fn test_create_invalid_request_sends_nothing() {
    let mock = create_mock(MockResponse::json(201, json!({"key": "KAN-9"}))).await;
    let request = IssueCreationRequest::new("", "Title", "Body");

    let outcome = client().create_issue(&credentials(&mock), &request).await;

    assert!(!outcome.is_success());
    assert_eq!(mock.hits(), 0);
}
