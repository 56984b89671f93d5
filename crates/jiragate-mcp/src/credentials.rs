//! Per-invocation credential resolution.
//!
//! Two deployment shapes share one contract:
//! - **headers** (multi-tenant): every request carries `x-jira-url`,
//!   `x-jira-email` and `x-jira-token`, so one server can act for many accounts
//! - **static** (single-tenant): credentials are fixed at startup from
//!   [`GatewayConfig`](crate::config::GatewayConfig)
//!
//! Resolution happens on every call and nothing is cached, because header
//! values may differ from one invocation to the next.

use http::HeaderMap;
use jiragate::Credentials;
use std::fmt;

/// Header carrying the tracker base URL.
pub const URL_HEADER: &str = "x-jira-url";

/// Header carrying the account email.
pub const EMAIL_HEADER: &str = "x-jira-email";

/// Header carrying the API token.
pub const TOKEN_HEADER: &str = "x-jira-token";

/// Required headers, in the order missing ones are reported.
pub const REQUIRED_HEADERS: [&str; 3] = [URL_HEADER, EMAIL_HEADER, TOKEN_HEADER];

/// The required metadata entries absent from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(Vec<&'static str>);

impl MissingFields {
    /// Names of the missing entries, in declaration order.
    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.0
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing required headers: {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingFields {}

/// Where credentials come from for each invocation.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read from the request's HTTP headers.
    Headers,
    /// Fixed for the process lifetime.
    Static(Credentials),
}

impl CredentialSource {
    /// Resolve credentials for one invocation.
    ///
    /// `headers` is the HTTP header map of the in-flight request, or `None`
    /// when the transport carries no HTTP metadata (stdio).
    ///
    /// # Errors
    ///
    /// In headers mode, returns [`MissingFields`] listing every required
    /// header that is absent, empty, or not valid UTF-8. Static mode never
    /// fails here; its settings were validated at startup.
    pub fn resolve(&self, headers: Option<&HeaderMap>) -> Result<Credentials, MissingFields> {
        match self {
            Self::Static(credentials) => Ok(credentials.clone()),
            Self::Headers => {
                let values = REQUIRED_HEADERS.map(|name| header_value(headers, name));
                if let [Some(url), Some(email), Some(token)] = values {
                    return Ok(Credentials::new(url, email, token));
                }

                let missing = REQUIRED_HEADERS
                    .into_iter()
                    .zip(values)
                    .filter_map(|(name, value)| value.is_none().then_some(name))
                    .collect();
                Err(MissingFields(missing))
            }
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Headers => "headers",
            Self::Static(_) => "static",
        }
    }
}

fn header_value<'a>(headers: Option<&'a HeaderMap>, name: &str) -> Option<&'a str> {
    headers?
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
