//! # mcp-server
//!
//! MCP (Model Context Protocol) servers for remote site maintenance:
//! - `ftp_mcp`: FTP/SFTP file tools over [`remote_fs`]
//! - `wordpress_mcp`: WordPress REST tools over [`wp_client`]
//!
//! Both run over the stdio or HTTP/SSE transport.

pub mod config;
pub mod protocol;
mod server;
pub mod tools;
pub mod transport;

pub use config::{ServerSettings, SettingsError};
pub use protocol::{McpError, McpMessage, RequestHandler, ServerCapabilities};
pub use server::{McpServer, ServerMode};
pub use tools::{FtpTools, ToolError, ToolProvider, WordPressTools};
pub use transport::{HttpTransport, StdioTransport};

/// Install the `tracing` subscriber used by the server binaries.
///
/// Logs go to stderr so stdout stays reserved for the stdio protocol.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
