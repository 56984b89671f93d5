//! Command-line interface.

use crate::config::{CredentialMode, EMAIL_ENV, TOKEN_ENV, TrackerSettings, URL_ENV};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Transport the server listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// JSON-RPC over stdin/stdout.
    Stdio,
    /// Streamable HTTP.
    Http,
}

/// JIRA tool gateway for MCP clients.
#[derive(Parser, Debug, Clone)]
#[command(name = "jiragate-mcp", version, about, long_about = None)]
pub struct Cli {
    /// Transport to serve on
    #[arg(long, value_enum, default_value = "http")]
    pub transport: Transport,

    /// Address to bind when serving HTTP
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// URL path of the MCP endpoint when serving HTTP
    #[arg(long, default_value = "/mcp")]
    pub path: String,

    /// Where credentials come from
    ///
    /// Defaults to `headers` for HTTP and `static` for stdio.
    #[arg(long, value_enum)]
    pub credentials: Option<CredentialMode>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JIRA base URL (static mode)
    #[arg(long, env = URL_ENV)]
    pub jira_url: Option<String>,

    /// JIRA account email (static mode)
    #[arg(long, env = EMAIL_ENV)]
    pub jira_email: Option<String>,

    /// JIRA API token (static mode)
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub jira_api_token: Option<String>,
}

impl Cli {
    /// Credential mode after applying the transport default.
    #[must_use]
    pub fn effective_mode(&self) -> CredentialMode {
        self.credentials.unwrap_or(match self.transport {
            Transport::Http => CredentialMode::Headers,
            Transport::Stdio => CredentialMode::Static,
        })
    }

    /// Tracker settings given on the command line or in the environment.
    #[must_use]
    pub fn tracker_overrides(&self) -> TrackerSettings {
        TrackerSettings {
            url: self.jira_url.clone(),
            email: self.jira_email.clone(),
            api_token: self.jira_api_token.clone(),
        }
    }
}
