//! Startup configuration.
//!
//! Settings are assembled once in `main` from an optional YAML file and
//! command-line / environment overrides, then handed to the server by value.
//! Nothing below `main` reads the process environment.
//!
//! ```yaml
//! tracker:
//!   url: https://acme.atlassian.net
//!   email: bot@acme.io
//! timeouts:
//!   fetch-secs: 15
//!   create-secs: 20
//! ```

use crate::credentials::CredentialSource;
use crate::error::{Error, Result};
use jiragate::{ClientSettings, Credentials};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Tracker base URL used in static mode when none is configured.
pub const DEFAULT_TRACKER_URL: &str = "http://localhost:8080";

/// Environment variable for the tracker base URL.
pub const URL_ENV: &str = "JIRA_URL";

/// Environment variable for the account email.
pub const EMAIL_ENV: &str = "JIRA_EMAIL";

/// Environment variable for the API token.
pub const TOKEN_ENV: &str = "JIRA_API_TOKEN";

/// How credentials are supplied to tool invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CredentialMode {
    /// Per request, from `x-jira-*` HTTP headers (multi-tenant).
    Headers,
    /// Fixed at startup from configuration (single-tenant).
    Static,
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GatewayConfig {
    /// Tracker connection settings for static mode.
    pub tracker: TrackerSettings,

    /// Per-operation deadlines.
    pub timeouts: TimeoutSettings,
}

/// Tracker connection settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TrackerSettings {
    /// Base URL of the tracker. Falls back to [`DEFAULT_TRACKER_URL`].
    pub url: Option<String>,

    /// Account email for basic auth.
    pub email: Option<String>,

    /// API token for basic auth.
    pub api_token: Option<String>,
}

impl fmt::Debug for TrackerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerSettings")
            .field("url", &self.url)
            .field("email", &self.email)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Per-operation deadlines in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TimeoutSettings {
    /// Deadline for fetching an issue.
    pub fetch_secs: u64,

    /// Deadline for creating an issue.
    pub create_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        let defaults = ClientSettings::default();
        Self {
            fetch_secs: defaults.fetch_timeout.as_secs(),
            create_secs: defaults.create_timeout.as_secs(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigLoad`] if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| Error::ConfigLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| Error::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Replace tracker settings with any override that is set.
    #[must_use]
    pub fn with_overrides(mut self, overrides: TrackerSettings) -> Self {
        if overrides.url.is_some() {
            self.tracker.url = overrides.url;
        }
        if overrides.email.is_some() {
            self.tracker.email = overrides.email;
        }
        if overrides.api_token.is_some() {
            self.tracker.api_token = overrides.api_token;
        }
        self
    }

    /// Client deadlines derived from [`TimeoutSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSetting`] if a deadline is zero.
    pub fn client_settings(&self) -> Result<ClientSettings> {
        let seconds = |name: &'static str, secs: u64| {
            if secs == 0 {
                Err(Error::InvalidSetting {
                    name,
                    reason: "timeout must be at least one second".to_string(),
                })
            } else {
                Ok(Duration::from_secs(secs))
            }
        };

        Ok(ClientSettings {
            fetch_timeout: seconds("timeouts.fetch-secs", self.timeouts.fetch_secs)?,
            create_timeout: seconds("timeouts.create-secs", self.timeouts.create_secs)?,
        })
    }

    /// Build the credential source for `mode`.
    ///
    /// Static mode is validated here so a misconfigured single-tenant server
    /// refuses to start instead of failing every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSetting`] in static mode if the email or API
    /// token is absent or blank.
    pub fn credential_source(&self, mode: CredentialMode) -> Result<CredentialSource> {
        match mode {
            CredentialMode::Headers => Ok(CredentialSource::Headers),
            CredentialMode::Static => {
                let tracker = &self.tracker;
                let url = non_blank(tracker.url.as_deref()).unwrap_or(DEFAULT_TRACKER_URL);
                let email = non_blank(tracker.email.as_deref())
                    .ok_or(Error::MissingSetting { name: EMAIL_ENV })?;
                let token = non_blank(tracker.api_token.as_deref())
                    .ok_or(Error::MissingSetting { name: TOKEN_ENV })?;

                Ok(CredentialSource::Static(Credentials::new(url, email, token)))
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
