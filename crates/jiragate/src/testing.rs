//! In-process mock of the JIRA issue endpoints.
//!
//! Available with the `test-util` feature. The mock binds an ephemeral port
//! on localhost, answers `GET /rest/api/3/issue/{key}` and
//! `POST /rest/api/3/issue` with canned responses, and records every request
//! it sees so tests can assert on what was (or was not) sent.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A canned reply from the mock tracker.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Reply with a status and JSON body.
    Json(StatusCode, serde_json::Value),
    /// Reply with a status and plain-text body.
    Text(StatusCode, String),
    /// Never reply within any reasonable deadline.
    Hang,
}

impl MockResponse {
    /// JSON reply.
    #[must_use]
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::Json(status_code(status), body)
    }

    /// Plain-text reply.
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::Text(status_code(status), body.into())
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path as sent, still percent-encoded, e.g. `/rest/api/3/issue/KAN-2`.
    pub path: String,
    /// Raw `Authorization` header, if any.
    pub authorization: Option<String>,
    /// Raw `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Request body (empty for GET).
    pub body: Bytes,
}

impl RecordedRequest {
    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }
}

struct MockState {
    fetch: MockResponse,
    create: MockResponse,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn record(&self, method: Method, path: String, headers: &HeaderMap, body: Bytes) {
        let header_value = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let request = RecordedRequest {
            method,
            path,
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
            body,
        };
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

/// Mock JIRA server running on a background task.
///
/// The server stops when the mock is dropped.
pub struct MockTracker {
    base_url: String,
    state: Arc<MockState>,
    task: JoinHandle<()>,
}

impl MockTracker {
    /// Start a mock answering fetches with `fetch` and creates with `create`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start(fetch: MockResponse, create: MockResponse) -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            fetch,
            create,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/rest/api/3/issue/{key}", get(fetch_issue))
            .route("/rest/api/3/issue", post(create_issue))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock tracker stopped");
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            state,
            task,
        })
    }

    /// Start a mock that answers every fetch with `response`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn for_fetch(response: MockResponse) -> std::io::Result<Self> {
        Self::start(response, MockResponse::text(500, "unexpected create")).await
    }

    /// Start a mock that answers every create with `response`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn for_create(response: MockResponse) -> std::io::Result<Self> {
        Self::start(MockResponse::text(500, "unexpected fetch"), response).await
    }

    /// Base URL to use in credentials, e.g. `http://127.0.0.1:40123`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.lock_requests().len()
    }

    /// All requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock_requests().clone()
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock_requests().last().cloned()
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<RecordedRequest>> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for MockTracker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn fetch_issue(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(Method::GET, uri.path().to_string(), &headers, Bytes::new());
    respond(&state.fetch).await
}

async fn create_issue(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.record(
        Method::POST,
        "/rest/api/3/issue".to_string(),
        &headers,
        body,
    );
    respond(&state.create).await
}

async fn respond(response: &MockResponse) -> Response {
    match response {
        MockResponse::Json(status, body) => (*status, axum::Json(body.clone())).into_response(),
        MockResponse::Text(status, body) => (*status, body.clone()).into_response(),
        MockResponse::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}
