//! Jiragate MCP server binary.

use clap::Parser;
use jiragate::JiraClient;
use jiragate_mcp::JiragateMcpServer;
use jiragate_mcp::cli::{Cli, Transport};
use jiragate_mcp::config::{CredentialMode, GatewayConfig};
use jiragate_mcp::tools::Tools;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "jiragate=info,jiragate_mcp=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the stdio transport.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GatewayConfig::load(path).await?,
        None => GatewayConfig::default(),
    }
    .with_overrides(cli.tracker_overrides());

    let mode = cli.effective_mode();
    if cli.transport == Transport::Stdio && mode == CredentialMode::Headers {
        tracing::warn!("stdio carries no request headers; every tool call will be rejected");
    }
    let client = JiraClient::new(config.client_settings()?)?;
    let credentials = config.credential_source(mode)?;

    let server = JiragateMcpServer::new(Tools::new(client, credentials));
    let endpoint = match cli.transport {
        Transport::Stdio => "stdio".to_string(),
        Transport::Http => format!("http://{}{}", cli.bind, cli.path),
    };
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        %endpoint,
        credentials = server.tools().credential_source().mode(),
        tools = ?server.tool_names(),
        "Starting jiragate-mcp server"
    );

    match cli.transport {
        Transport::Stdio => server.serve_stdio().await?,
        Transport::Http => server.serve_http(cli.bind, &cli.path).await?,
    }

    Ok(())
}
