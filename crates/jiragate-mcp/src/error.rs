//! Error types for the jiragate MCP server.
//!
//! These cover startup and transport failures only. Tool invocations never
//! surface an `Error`; they always produce a
//! [`ToolOutcome`](jiragate::ToolOutcome).

use thiserror::Error;

/// Errors that can occur while configuring or running the server.
#[derive(Debug, Error)]
pub enum Error {
    /// A setting required by the chosen credential mode is absent.
    #[error("Missing required setting {name}. Set it in the environment or the config file.")]
    MissingSetting {
        /// Environment variable name of the setting.
        name: &'static str,
    },

    /// A setting has an unusable value.
    #[error("Invalid {name}: {reason}")]
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("Failed to load config from {path}: {reason}")]
    ConfigLoad {
        /// Path of the config file.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("Client error: {0}")]
    Client(#[from] jiragate::TrackerError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// MCP protocol or transport error.
    #[error("MCP error: {0}")]
    Mcp(String),
}

/// Result type for jiragate MCP operations.
pub type Result<T> = std::result::Result<T, Error>;
