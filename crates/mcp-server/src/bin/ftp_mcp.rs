//! ftp_mcp - FTP/SFTP file tools for MCP clients
//!
//! Credentials are passed per tool call; nothing is stored on disk.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use mcp_server::{FtpTools, McpServer, ServerMode, ServerSettings};
use remote_fs::{ConnectionPool, FileTransferService};

/// MCP server exposing FTP and SFTP file operations
#[derive(Parser, Debug)]
#[command(name = "ftp-mcp")]
#[command(version)]
#[command(about = "FTP/SFTP file operations via MCP")]
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
    #[arg(long, env = "FTP_MCP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    mcp_server::init_logging();

    let settings = ServerSettings::load(args.config.as_deref(), "ftp-mcp")?;
    info!(
        "Character limit {}, max file size {} bytes",
        settings.character_limit, settings.max_file_size
    );

    let pool = Arc::new(ConnectionPool::new());
    let service = FileTransferService::new(pool, settings.transfer_limits());
    let tools = Arc::new(FtpTools::new(service.clone(), settings.character_limit));

    let mode = ServerMode::from_flags(args.stdio, args.http, args.port);
    let result = McpServer::new(tools).with_mode(mode).run().await;

    if let Err(e) = service.close_sessions().await {
        warn!("Closing cached sessions failed: {}", e);
    }
    result
}
