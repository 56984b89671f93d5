//! Error types for JIRA client operations.

use thiserror::Error;

/// Maximum characters of a response body kept when a fetch fails.
pub const FETCH_BODY_EXCERPT: usize = 200;

/// Maximum characters of a response body kept when a create fails.
pub const CREATE_BODY_EXCERPT: usize = 300;

/// Errors that can occur while talking to the issue tracker.
///
/// The `Display` text of each variant is what the agent eventually reads,
/// so the messages are written for a person rather than a log parser.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A required input was empty, so no request was sent.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// The backend answered 404 for the requested issue.
    #[error("Issue '{0}' not found.")]
    NotFound(String),

    /// The backend rejected the credentials (401).
    #[error("JIRA authentication failed - check your email and API token.")]
    Unauthorized,

    /// The backend answered a fetch with an unexpected status.
    #[error("JIRA error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading excerpt of the response body.
        body: String,
    },

    /// The backend refused to create the issue.
    #[error("Failed to create issue: {status}\n{body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Leading excerpt of the response body.
        body: String,
    },

    /// The configured base URL cannot address the REST API.
    #[error("Invalid JIRA URL '{url}': {reason}")]
    InvalidUrl {
        /// Base URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request did not complete within its deadline.
    #[error("Timeout {0}")]
    Timeout(&'static str),

    /// Connection, TLS, or protocol failure below the HTTP status layer.
    #[error("Unexpected error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be understood.
    #[error("Unexpected error: invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TrackerError {
    /// Classify a `reqwest` error, splitting timeouts from everything else.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_context: &'static str) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_context)
        } else {
            Self::Transport(err)
        }
    }
}

/// Result type for JIRA client operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Keep at most `max_chars` characters of `body`.
///
/// Counts `char`s rather than bytes so a multi-byte character is never split.
#[must_use]
pub fn excerpt(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::shorter("abc", 5, "abc")]
    #[case::exact("abcde", 5, "abcde")]
    #[case::longer("abcdefgh", 5, "abcde")]
    #[case::empty("", 5, "")]
    #[case::multibyte("ééééé", 3, "ééé")]
    fn test_excerpt(#[case] body: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(excerpt(body, max), expected);
    }

    #[test]
    fn test_messages_are_agent_readable() {
        assert_eq!(
            TrackerError::NotFound("KAN-2".into()).to_string(),
            "Issue 'KAN-2' not found."
        );
        assert!(TrackerError::Unauthorized
            .to_string()
            .contains("authentication failed"));
        assert_eq!(
            TrackerError::Timeout("reaching JIRA server").to_string(),
            "Timeout reaching JIRA server"
        );
        assert_eq!(
            TrackerError::Rejected {
                status: 400,
                body: "bad".into()
            }
            .to_string(),
            "Failed to create issue: 400\nbad"
        );
    }
}
