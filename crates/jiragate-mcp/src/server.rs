//! MCP server implementation.
//!
//! This module contains the tool registry and the two transports: stdio for
//! single-user setups and streamable HTTP for shared, header-authenticated
//! deployments.

use crate::error::Error;
use crate::models::{CreateIssueParams, FetchIssueParams};
use crate::tools::Tools;
use axum::Router;
use http::HeaderMap;
use jiragate::ToolOutcome;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use rmcp::{
    handler::server::ServerHandler, tool, tool_handler, tool_router, ErrorData as McpError,
    RoleServer, ServiceExt,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// The jiragate MCP server.
///
/// Cheap to clone; the HTTP transport clones it once per session.
#[derive(Clone)]
pub struct JiragateMcpServer {
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl JiragateMcpServer {
    /// Fetch an issue.
    #[tool(
        name = "fetch-issue",
        description = "Retrieve summary, status, and assignee for a JIRA issue by key (e.g. KAN-2)."
    )]
    async fn fetch_issue(
        &self,
        Parameters(params): Parameters<FetchIssueParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .tools
            .fetch_issue(request_headers(&context), params)
            .await;
        Ok(call_result(outcome))
    }

    /// Create an issue.
    #[tool(
        name = "create-issue",
        description = "Create a new JIRA issue with a project key, summary and plain-text description. Issue type defaults to Task; labels are optional."
    )]
    async fn create_issue(
        &self,
        Parameters(params): Parameters<CreateIssueParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .tools
            .create_issue(request_headers(&context), params)
            .await;
        Ok(call_result(outcome))
    }
}

impl JiragateMcpServer {
    /// Create a server exposing `tools`.
    #[must_use]
    pub fn new(tools: Tools) -> Self {
        Self {
            tools: Arc::new(tools),
            tool_router: Self::tool_router(),
        }
    }

    /// The tool implementations behind this server.
    #[must_use]
    pub fn tools(&self) -> &Tools {
        &self.tools
    }

    /// Names of all registered tools.
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    /// Serve over stdin/stdout until the client disconnects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mcp`] if the handshake or the session fails.
    pub async fn serve_stdio(self) -> crate::error::Result<()> {
        let running = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| Error::Mcp(e.to_string()))?;
        let reason = running
            .waiting()
            .await
            .map_err(|e| Error::Mcp(e.to_string()))?;
        info!(?reason, "stdio session ended");
        Ok(())
    }

    /// Build the axum router serving streamable HTTP at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSetting`] if `path` does not start with `/`.
    pub fn http_router(self, path: &str) -> crate::error::Result<Router> {
        if !path.starts_with('/') {
            return Err(Error::InvalidSetting {
                name: "path",
                reason: format!("'{path}' must start with '/'"),
            });
        }

        let service = StreamableHttpService::new(
            move || Ok(self.clone()),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig::default(),
        );

        Ok(if path == "/" {
            Router::new().fallback_service(service)
        } else {
            Router::new().nest_service(path, service)
        })
    }

    /// Serve streamable HTTP on `bind` until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid, the address cannot be bound,
    /// or the server fails.
    pub async fn serve_http(self, bind: SocketAddr, path: &str) -> crate::error::Result<()> {
        let router = self.http_router(path)?;
        let listener = tokio::net::TcpListener::bind(bind).await?;
        info!(addr = %listener.local_addr()?, path, "Listening for MCP over HTTP");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("HTTP server stopped");
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for JiragateMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "jiragate-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Jiragate".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "JIRA gateway. Use fetch-issue to read an issue and create-issue to open one. \
                 Every call returns a single text result; failures start with ❌."
                    .into(),
            ),
        }
    }
}

/// HTTP headers of the request carrying this tool call, if any.
fn request_headers(context: &RequestContext<RoleServer>) -> Option<&HeaderMap> {
    context
        .extensions
        .get::<http::request::Parts>()
        .map(|parts| &parts.headers)
}

/// Map an outcome onto the MCP result, flagging failures with `is_error`.
#[must_use]
pub fn call_result(outcome: ToolOutcome) -> CallToolResult {
    match outcome {
        ToolOutcome::Success(text) => CallToolResult::success(vec![Content::text(text)]),
        ToolOutcome::Failure(text) => CallToolResult::error(vec![Content::text(text)]),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; shutting down");
    }
}
