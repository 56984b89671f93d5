//! HTTP client for the two supported JIRA operations.
//!
//! Each operation comes in two shapes:
//! - a structured call ([`JiraClient::issue_summary`], [`JiraClient::submit_issue`])
//!   returning `Result<_, TrackerError>`
//! - a text call ([`JiraClient::fetch_issue`], [`JiraClient::create_issue`])
//!   rendering that result into a [`ToolOutcome`]
//!
//! Both shapes share the same status mapping, so callers choosing either one
//! see the same normalization.

use crate::credentials::Credentials;
use crate::error::{excerpt, Result, TrackerError, CREATE_BODY_EXCERPT, FETCH_BODY_EXCERPT};
use crate::models::{IssueCreationRequest, IssueCreationResult, IssueKey, IssueSummary};
use crate::outcome::ToolOutcome;
use reqwest::header::ACCEPT;
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default deadline for fetching an issue.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Default deadline for creating an issue.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(20);

const JSON: &str = "application/json";
const FETCH_TIMEOUT_CONTEXT: &str = "reaching JIRA server";
const CREATE_TIMEOUT_CONTEXT: &str = "while creating issue";

/// Per-operation deadlines, fixed for the lifetime of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    /// Deadline for `GET /rest/api/3/issue/{key}`.
    pub fetch_timeout: Duration,
    /// Deadline for `POST /rest/api/3/issue`.
    pub create_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            create_timeout: DEFAULT_CREATE_TIMEOUT,
        }
    }
}

/// Stateless JIRA client.
///
/// Holds no credentials: every call receives its own [`Credentials`], so one
/// client can serve many tenants. The inner connection pool is safe to share
/// across concurrent invocations.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl JiraClient {
    /// Create a client with the given deadlines.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] if the HTTP stack cannot be
    /// initialized (for example, no TLS backend is available).
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("jiragate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TrackerError::Transport)?;

        Ok(Self { http, settings })
    }

    /// The deadlines this client applies.
    #[must_use]
    pub fn settings(&self) -> ClientSettings {
        self.settings
    }

    /// Fetch key facts about an issue.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::NotFound`] on 404
    /// - [`TrackerError::Unauthorized`] on 401
    /// - [`TrackerError::Status`] on any other non-success status
    /// - [`TrackerError::InvalidUrl`] if the base URL cannot be extended (no request is sent)
    /// - [`TrackerError::Timeout`] if the fetch deadline passes
    /// - [`TrackerError::Transport`] / [`TrackerError::Decode`] otherwise
    pub async fn issue_summary(
        &self,
        credentials: &Credentials,
        key: &IssueKey,
    ) -> Result<IssueSummary> {
        let url = credentials.issue_url(key.as_str())?;
        debug!(%url, issue_key = %key, "Fetching issue");

        let response = self
            .http
            .get(url)
            .basic_auth(credentials.identity(), Some(credentials.secret()))
            .header(ACCEPT, JSON)
            .timeout(self.settings.fetch_timeout)
            .send()
            .await
            .map_err(|e| TrackerError::from_reqwest(e, FETCH_TIMEOUT_CONTEXT))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(TrackerError::NotFound(key.to_string())),
            StatusCode::UNAUTHORIZED => Err(TrackerError::Unauthorized),
            status if !status.is_success() => Err(TrackerError::Status {
                status: status.as_u16(),
                body: body_excerpt(response, FETCH_BODY_EXCERPT, FETCH_TIMEOUT_CONTEXT).await?,
            }),
            _ => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| TrackerError::from_reqwest(e, FETCH_TIMEOUT_CONTEXT))?;
                IssueSummary::from_json(&body)
            }
        }
    }

    /// Create an issue.
    ///
    /// `assignee_email` is never sent; a warning is logged when it is set.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::EmptyField`] if a mandatory field is blank (no request is sent)
    /// - [`TrackerError::Rejected`] on any status other than 200 or 201
    /// - [`TrackerError::Timeout`] if the create deadline passes
    /// - [`TrackerError::Transport`] / [`TrackerError::Decode`] otherwise
    pub async fn submit_issue(
        &self,
        credentials: &Credentials,
        request: &IssueCreationRequest,
    ) -> Result<IssueCreationResult> {
        request.validate()?;

        if request.assignee_email.is_some() {
            warn!(
                project_key = %request.project_key,
                "assigneeEmail is not applied; the issue will be created unassigned"
            );
        }

        let url = credentials.issue_endpoint();
        debug!(
            %url,
            project_key = %request.project_key,
            issue_type = %request.issue_type,
            "Creating issue"
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(credentials.identity(), Some(credentials.secret()))
            .header(ACCEPT, JSON)
            .json(&request.payload())
            .timeout(self.settings.create_timeout)
            .send()
            .await
            .map_err(|e| TrackerError::from_reqwest(e, CREATE_TIMEOUT_CONTEXT))?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| TrackerError::from_reqwest(e, CREATE_TIMEOUT_CONTEXT))?;
                IssueCreationResult::from_json(&body, request, |key| credentials.browse_url(key))
            }
            status => Err(TrackerError::Rejected {
                status: status.as_u16(),
                body: body_excerpt(response, CREATE_BODY_EXCERPT, CREATE_TIMEOUT_CONTEXT)
                    .await?,
            }),
        }
    }

    /// Fetch an issue and render the result as text.
    ///
    /// Never fails: every error becomes a [`ToolOutcome::Failure`].
    pub async fn fetch_issue(&self, credentials: &Credentials, key: &str) -> ToolOutcome {
        let result = async {
            let key = IssueKey::new(key)?;
            self.issue_summary(credentials, &key).await
        }
        .await;

        match &result {
            Ok(summary) => {
                info!(issue_key = %summary.key, status = %summary.status, "Fetched issue");
            }
            Err(err) => warn!(issue_key = %key, error = %err, "Fetch issue failed"),
        }
        ToolOutcome::from(result)
    }

    /// Create an issue and render the result as text.
    ///
    /// Never fails: every error becomes a [`ToolOutcome::Failure`].
    pub async fn create_issue(
        &self,
        credentials: &Credentials,
        request: &IssueCreationRequest,
    ) -> ToolOutcome {
        let result = self.submit_issue(credentials, request).await;

        match &result {
            Ok(created) => {
                info!(
                    issue_key = %created.key,
                    project_key = %request.project_key,
                    "Created issue"
                );
            }
            Err(err) => {
                warn!(project_key = %request.project_key, error = %err, "Create issue failed");
            }
        }
        ToolOutcome::from(result)
    }
}

/// Read at most `max_chars` characters of an error response body.
async fn body_excerpt(
    response: Response,
    max_chars: usize,
    timeout_context: &'static str,
) -> Result<String> {
    let body = response
        .text()
        .await
        .map_err(|e| TrackerError::from_reqwest(e, timeout_context))?;
    Ok(excerpt(&body, max_chars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ClientSettings::default();
        assert_eq!(settings.fetch_timeout, Duration::from_secs(15));
        assert_eq!(settings.create_timeout, Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_blank_key_fails_without_request() {
        let client = JiraClient::new(ClientSettings::default()).unwrap();
        // Port 9 (discard) would fail to connect; a blank key must never get that far.
        let creds = Credentials::new("http://127.0.0.1:9", "me@acme.io", "token");

        let outcome = client.fetch_issue(&creds, "   ").await;
        assert!(!outcome.is_success());
        assert!(outcome.text().contains("issue key must not be empty"));
    }

    #[tokio::test]
    async fn test_blank_summary_fails_without_request() {
        let client = JiraClient::new(ClientSettings::default()).unwrap();
        let creds = Credentials::new("http://127.0.0.1:9", "me@acme.io", "token");
        let request = IssueCreationRequest::new("KAN", "", "Body");

        let outcome = client.create_issue(&creds, &request).await;
        assert!(outcome.text().contains("summary must not be empty"));
    }
}
