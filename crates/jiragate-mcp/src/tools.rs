//! MCP tool implementations.
//!
//! Every tool follows the same path: resolve credentials for this
//! invocation, short-circuit with a failure if any are missing, otherwise
//! delegate to the [`JiraClient`] and hand back its outcome unchanged.
//! The delegate runs under a panic guard so that even an internal fault
//! still yields exactly one [`ToolOutcome`].

use crate::credentials::CredentialSource;
use crate::models::{CreateIssueParams, FetchIssueParams};
use futures::FutureExt;
use http::HeaderMap;
use jiragate::{Credentials, IssueCreationRequest, JiraClient, ToolOutcome};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, warn};

/// Name of the fetch tool as advertised to clients.
pub const FETCH_ISSUE: &str = "fetch-issue";

/// Name of the create tool as advertised to clients.
pub const CREATE_ISSUE: &str = "create-issue";

/// Tool implementations for the jiragate MCP server.
#[derive(Debug, Clone)]
pub struct Tools {
    client: JiraClient,
    credentials: CredentialSource,
}

impl Tools {
    /// Create tools backed by `client`, resolving credentials from `credentials`.
    #[must_use]
    pub fn new(client: JiraClient, credentials: CredentialSource) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// The credential source in use.
    #[must_use]
    pub fn credential_source(&self) -> &CredentialSource {
        &self.credentials
    }

    /// Fetch summary, status and assignee of an issue.
    ///
    /// `headers` are the HTTP headers of the in-flight request, if the
    /// transport has any.
    pub async fn fetch_issue(
        &self,
        headers: Option<&HeaderMap>,
        params: FetchIssueParams,
    ) -> ToolOutcome {
        let credentials = match self.resolve(FETCH_ISSUE, headers) {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };

        guarded(
            FETCH_ISSUE,
            self.client.fetch_issue(&credentials, &params.issue_key),
        )
        .await
    }

    /// Create an issue.
    pub async fn create_issue(
        &self,
        headers: Option<&HeaderMap>,
        params: CreateIssueParams,
    ) -> ToolOutcome {
        let credentials = match self.resolve(CREATE_ISSUE, headers) {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };

        let request = IssueCreationRequest::from(params);
        guarded(CREATE_ISSUE, self.client.create_issue(&credentials, &request)).await
    }

    fn resolve(
        &self,
        tool: &'static str,
        headers: Option<&HeaderMap>,
    ) -> Result<Credentials, ToolOutcome> {
        match self.credentials.resolve(headers) {
            Ok(credentials) => {
                debug!(
                    tool,
                    mode = self.credentials.mode(),
                    identity = credentials.identity(),
                    "Resolved credentials"
                );
                Ok(credentials)
            }
            Err(missing) => {
                warn!(tool, missing = ?missing.names(), "Rejecting call without credentials");
                Err(ToolOutcome::failure(missing))
            }
        }
    }
}

/// Run a tool future, turning a panic into a failure outcome.
async fn guarded<F>(tool: &'static str, future: F) -> ToolOutcome
where
    F: Future<Output = ToolOutcome>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(tool, %message, "Tool panicked");
            ToolOutcome::failure(format!("Unexpected internal error: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guarded_passes_outcome_through() {
        let outcome = guarded("test", async { ToolOutcome::success("ok") }).await;
        assert_eq!(outcome, ToolOutcome::success("ok"));
    }

    async fn explode(message: String) -> ToolOutcome {
        panic!("{message}")
    }

    #[tokio::test]
    async fn test_guarded_converts_panic() {
        let outcome = guarded("test", explode("backend exploded".to_string())).await;

        assert!(!outcome.is_success());
        assert!(outcome.text().contains("Unexpected internal error: backend exploded"));
    }

    #[tokio::test]
    async fn test_guarded_handles_static_str_payload() {
        async fn static_panic() -> ToolOutcome {
            panic!("static message")
        }

        let outcome = guarded("test", static_panic()).await;
        assert!(outcome.text().contains("static message"));
    }
}
