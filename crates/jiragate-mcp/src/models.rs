//! MCP tool parameter models.
//!
//! Field names are camelCase on the wire; `schemars` derives the JSON schema
//! advertised to clients from these types and their doc comments.

use jiragate::models::DEFAULT_ISSUE_TYPE;
use jiragate::IssueCreationRequest;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `fetch-issue` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FetchIssueParams {
    /// The JIRA issue key (e.g. "KAN-2").
    pub issue_key: String,
}

/// Parameters for the `create-issue` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueParams {
    /// The JIRA project key (e.g. "KAN").
    pub project_key: String,

    /// The issue title.
    pub summary: String,

    /// Detailed plain-text description.
    pub description: String,

    /// Type of issue (Task, Bug, Story, Epic, ...). Defaults to "Task".
    #[serde(default = "default_issue_type")]
    pub issue_type: String,

    /// Labels to add (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,

    /// Email of the person to assign (optional). Currently not applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_email: Option<String>,
}

fn default_issue_type() -> String {
    DEFAULT_ISSUE_TYPE.to_string()
}

impl From<CreateIssueParams> for IssueCreationRequest {
    fn from(params: CreateIssueParams) -> Self {
        Self {
            project_key: params.project_key,
            summary: params.summary,
            description: params.description,
            issue_type: params.issue_type,
            labels: params.labels,
            assignee_email: params.assignee_email,
        }
    }
}
