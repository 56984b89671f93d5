//! The single-string result every tool invocation produces.

use crate::error::TrackerError;
use std::fmt;

/// Prefix placed in front of every failure message.
pub const FAILURE_MARKER: &str = "❌";

/// Result of one tool invocation, always rendered as text.
///
/// Consumers are agents that expect one readable answer per call, so
/// failures are values here rather than errors to propagate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The operation completed; the text describes the result.
    Success(String),
    /// The operation failed; the text explains why.
    Failure(String),
}

impl ToolOutcome {
    /// Wrap a success message.
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success(text.into())
    }

    /// Wrap a failure message, adding the failure marker.
    pub fn failure(message: impl fmt::Display) -> Self {
        Self::Failure(format!("{FAILURE_MARKER} {message}"))
    }

    /// Whether this is a [`ToolOutcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The rendered text, whichever variant this is.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    /// Consume the outcome, keeping only its text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }
}

impl fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl<T: fmt::Display> From<Result<T, TrackerError>> for ToolOutcome {
    fn from(result: Result<T, TrackerError>) -> Self {
        match result {
            Ok(value) => Self::success(value.to_string()),
            Err(err) => Self::failure(err),
        }
    }
}
