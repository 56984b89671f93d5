//! MCP gateway exposing JIRA issue operations to AI assistants.
//!
//! The server advertises two tools, `fetch-issue` and `create-issue`, and
//! forwards each invocation to the [`jiragate`] client with credentials
//! resolved for that call alone.
//!
//! # Architecture
//!
//! - [`cli`] - command-line flags and their environment fallbacks
//! - [`config`] - YAML configuration, timeouts and credential mode
//! - [`credentials`] - per-invocation credential resolution from headers or startup settings
//! - [`tools`] - the tool bodies, independent of the MCP transport
//! - [`server`] - the `rmcp` router and the stdio / streamable HTTP transports
//!
//! # Tools
//!
//! - `fetch-issue` - summary, status and assignee of an issue
//! - `create-issue` - create an issue and return its key and browse URL

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::JiragateMcpServer;
