//! Access parameters for a single tracker call.

use crate::error::{Result, TrackerError};
use reqwest::Url;
use std::fmt;

/// Base URL, identity and secret used to authenticate one request.
///
/// Values are resolved per invocation and never stored beyond it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    base_url: String,
    identity: String,
    secret: String,
}

impl Credentials {
    /// Create credentials, dropping any trailing `/` from the base URL.
    pub fn new(
        base_url: impl Into<String>,
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            identity: identity.into(),
            secret: secret.into(),
        }
    }

    /// Tracker base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Account identity (email) for basic auth.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// API token for basic auth.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// `{base}/rest/api/3/issue`
    pub(crate) fn issue_endpoint(&self) -> String {
        format!("{}/rest/api/3/issue", self.base_url)
    }

    /// `{base}/rest/api/3/issue/{key}` with `key` escaped as one path segment.
    pub(crate) fn issue_url(&self, key: &str) -> Result<Url> {
        let invalid = |reason: String| TrackerError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.issue_endpoint()).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base URL".to_string()))?
            .push(key);
        Ok(url)
    }

    /// `{base}/browse/{key}`
    pub(crate) fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.base_url)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}
