//! wordpress_mcp - WordPress REST tools for MCP clients
//!
//! Authenticates per call with a WordPress application password.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use mcp_server::{McpServer, ServerMode, ServerSettings, WordPressTools};
use wp_client::WordPressClient;

/// MCP server exposing WordPress content, media, and moderation tools
#[derive(Parser, Debug)]
#[command(name = "wordpress-mcp")]
#[command(version)]
#[command(about = "WordPress site management via MCP")]
struct Args {
    /// Run in stdio mode (the default)
    #[arg(long)]
    stdio: bool,

    /// Run in HTTP mode
    #[arg(long)]
    http: bool,

    /// Port for HTTP mode
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, env = "WORDPRESS_MCP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    mcp_server::init_logging();

    let settings = ServerSettings::load(args.config.as_deref(), "wordpress-mcp")?;
    info!(
        "API base path {}, timeout {}s",
        settings.api_base_path, settings.request_timeout_secs
    );

    let client = WordPressClient::new(settings.request_timeout())?
        .with_api_base_path(settings.api_base_path.clone())
        .with_max_upload_size(settings.max_file_size);
    let tools = Arc::new(WordPressTools::new(client, settings.character_limit));

    let mode = ServerMode::from_flags(args.stdio, args.http, args.port);
    McpServer::new(tools).with_mode(mode).run().await
}
