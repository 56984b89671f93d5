//! Issue models and JIRA wire formats.
//!
//! Request payloads borrow from the caller's [`IssueCreationRequest`] and
//! serialize with a fixed field order, so the same request always produces
//! the same bytes. Response types are deliberately lenient: only the issue
//! `key` is required, every other field falls back to a readable default.

use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue type used when the caller does not name one.
pub const DEFAULT_ISSUE_TYPE: &str = "Task";

/// Summary shown when the issue has none.
pub const NO_SUMMARY: &str = "No summary";

/// Status shown when the issue reports none.
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Assignee shown when nobody is assigned.
pub const UNASSIGNED: &str = "Unassigned";

/// Opaque issue key such as `KAN-2`.
///
/// Only emptiness is checked locally; malformed keys are left for the
/// backend to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueKey(String);

impl IssueKey {
    /// Create an issue key, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::EmptyField`] if the key is blank.
    pub fn new(key: impl AsRef<str>) -> Result<Self> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(TrackerError::EmptyField("issue key"));
        }
        Ok(Self(key.to_string()))
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to create an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCreationRequest {
    /// Project key the issue belongs to (e.g. `KAN`).
    pub project_key: String,

    /// Issue title.
    pub summary: String,

    /// Plain-text description, wrapped in a single paragraph on the wire.
    pub description: String,

    /// Issue type name (Task, Bug, Story, Epic, ...).
    pub issue_type: String,

    /// Labels to attach. `None` and an empty list are treated the same.
    pub labels: Option<Vec<String>>,

    /// Email of the intended assignee.
    ///
    /// Accepted for interface compatibility but never sent: assigning needs
    /// an account id lookup that this client does not perform.
    pub assignee_email: Option<String>,
}

impl IssueCreationRequest {
    /// Create a request with the default issue type and no labels.
    pub fn new(
        project_key: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            summary: summary.into(),
            description: description.into(),
            issue_type: DEFAULT_ISSUE_TYPE.to_string(),
            labels: None,
            assignee_email: None,
        }
    }

    /// Set the issue type.
    #[must_use]
    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    /// Set the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Set the assignee email.
    #[must_use]
    pub fn with_assignee_email(mut self, email: impl Into<String>) -> Self {
        self.assignee_email = Some(email.into());
        self
    }

    /// Check the mandatory fields.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::EmptyField`] if the project key, summary or
    /// issue type is blank.
    pub fn validate(&self) -> Result<()> {
        if self.project_key.trim().is_empty() {
            return Err(TrackerError::EmptyField("project key"));
        }
        if self.summary.trim().is_empty() {
            return Err(TrackerError::EmptyField("summary"));
        }
        if self.issue_type.trim().is_empty() {
            return Err(TrackerError::EmptyField("issue type"));
        }
        Ok(())
    }

    /// Build the `POST /rest/api/3/issue` body for this request.
    #[must_use]
    pub fn payload(&self) -> CreateIssuePayload<'_> {
        CreateIssuePayload {
            fields: CreateIssueFields {
                project: KeyRef {
                    key: &self.project_key,
                },
                summary: &self.summary,
                description: Document::paragraph(&self.description),
                issuetype: NameRef {
                    name: &self.issue_type,
                },
                labels: self.labels.as_deref().filter(|labels| !labels.is_empty()),
            },
        }
    }
}

/// Body of a create-issue request.
#[derive(Debug, Serialize)]
pub struct CreateIssuePayload<'a> {
    fields: CreateIssueFields<'a>,
}

#[derive(Debug, Serialize)]
struct CreateIssueFields<'a> {
    project: KeyRef<'a>,
    summary: &'a str,
    description: Document<'a>,
    issuetype: NameRef<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct NameRef<'a> {
    name: &'a str,
}

/// Atlassian Document Format envelope holding one paragraph of text.
#[derive(Debug, Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    version: u8,
    content: [Paragraph<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Paragraph<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: [TextNode<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextNode<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> Document<'a> {
    fn paragraph(text: &'a str) -> Self {
        Self {
            kind: "doc",
            version: 1,
            content: [Paragraph {
                kind: "paragraph",
                content: [TextNode { kind: "text", text }],
            }],
        }
    }
}

/// The parts of `GET /rest/api/3/issue/{key}` this client reads.
#[derive(Debug, Deserialize)]
struct IssueResponse {
    key: String,
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
struct IssueFields {
    summary: Option<String>,
    status: Option<StatusField>,
    assignee: Option<AssigneeField>,
}

#[derive(Debug, Deserialize)]
struct StatusField {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssigneeField {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

/// Response of `POST /rest/api/3/issue`.
#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

/// Key facts about a fetched issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    /// Issue key.
    pub key: String,
    /// Issue title.
    pub summary: String,
    /// Workflow status name.
    pub status: String,
    /// Display name of the assignee, or [`UNASSIGNED`].
    pub assignee_name: String,
}

impl IssueSummary {
    /// Parse a fetch-issue response body.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Decode`] if the body is not JSON or has no `key`.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let response: IssueResponse = serde_json::from_slice(body)?;
        let fields = response.fields;

        Ok(Self {
            key: response.key,
            summary: fields.summary.unwrap_or_else(|| NO_SUMMARY.to_string()),
            status: fields
                .status
                .and_then(|status| status.name)
                .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
            assignee_name: fields
                .assignee
                .and_then(|assignee| assignee.display_name)
                .unwrap_or_else(|| UNASSIGNED.to_string()),
        })
    }
}

impl fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "📋 **JIRA Issue: {}**\n\n📌 **Summary:** {}\n📊 **Status:** {}\n👤 **Assignee:** {}",
            self.key, self.summary, self.status, self.assignee_name
        )
    }
}

/// What the tracker reported after creating an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCreationResult {
    /// Key assigned by the tracker.
    pub key: String,
    /// Human-facing link to the new issue.
    pub browse_url: String,
    /// Title that was submitted.
    pub summary: String,
    /// Issue type that was submitted.
    pub issue_type: String,
}

impl IssueCreationResult {
    /// Parse a create-issue response body, combining it with the request.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Decode`] if the body is not JSON or has no `key`.
    pub(crate) fn from_json(
        body: &[u8],
        request: &IssueCreationRequest,
        browse_url: impl FnOnce(&str) -> String,
    ) -> Result<Self> {
        let created: CreatedIssue = serde_json::from_slice(body)?;
        Ok(Self {
            browse_url: browse_url(&created.key),
            key: created.key,
            summary: request.summary.clone(),
            issue_type: request.issue_type.clone(),
        })
    }
}

impl fmt::Display for IssueCreationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "✅ **JIRA Issue Created Successfully!**\n\n📋 **Key:** {}\n🔗 **Link:** {}\n📌 **Summary:** {}\n📊 **Type:** {}",
            self.key, self.browse_url, self.summary, self.issue_type
        )
    }
}
