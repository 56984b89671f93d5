//! Minimal JIRA REST client for agent-facing tools.
//!
//! This crate performs exactly two calls against the JIRA Cloud REST API v3
//! and turns every result, including failures, into a [`ToolOutcome`]: a
//! single human-readable string that an AI assistant can read directly.
//!
//! # Architecture
//!
//! - [`credentials`] - the `{base_url, identity, secret}` triple used per call
//! - [`models`] - issue keys, creation requests, wire payloads and parsed results
//! - [`client`] - the [`JiraClient`] with its structured and text-rendering operations
//! - [`outcome`] - the [`ToolOutcome`] success/failure wrapper
//! - [`error`] - the [`TrackerError`] taxonomy that feeds failure messages
//!
//! Nothing is cached or retried: each operation is one HTTP request with a
//! fixed timeout, and a failed attempt is final.

pub mod client;
pub mod credentials;
pub mod error;
pub mod models;
pub mod outcome;

#[cfg(feature = "test-util")]
pub mod testing;

pub use client::{ClientSettings, JiraClient};
pub use credentials::Credentials;
pub use error::{Result, TrackerError};
pub use models::{IssueCreationRequest, IssueCreationResult, IssueKey, IssueSummary};
pub use outcome::ToolOutcome;
