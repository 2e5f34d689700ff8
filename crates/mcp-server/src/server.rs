//! Main MCP server orchestration

use std::sync::Arc;
use tracing::info;

use crate::tools::ToolProvider;
use crate::transport::{HttpTransport, StdioTransport};

/// Server mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerMode {
    /// stdio transport (default for MCP clients)
    #[default]
    Stdio,
    /// HTTP/SSE transport
    Http { port: u16 },
}

impl ServerMode {
    /// Pick the mode from CLI flags; stdio wins, then HTTP, then the default
    pub fn from_flags(stdio: bool, http: bool, port: u16) -> Self {
        if stdio {
            ServerMode::Stdio
        } else if http {
            ServerMode::Http { port }
        } else {
            ServerMode::Stdio
        }
    }
}

/// MCP server
pub struct McpServer {
    provider: Arc<dyn ToolProvider>,
    mode: ServerMode,
}

impl McpServer {
    pub fn new(provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            provider,
            mode: ServerMode::default(),
        }
    }

    /// Set the server mode
    pub fn with_mode(mut self, mode: ServerMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ServerMode {
        self.mode
    }

    /// Run until the transport shuts down
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self.mode {
            ServerMode::Stdio => {
                info!("Starting {} in stdio mode", self.provider.name());
                let mut transport = StdioTransport::new(self.provider.clone());
                transport.run().await
            }
            ServerMode::Http { port } => {
                info!("Starting {} in HTTP mode on port {}", self.provider.name(), port);
                let transport = HttpTransport::new(self.provider.clone(), port);
                transport.run().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(ServerMode::from_flags(false, false, 3000), ServerMode::Stdio);
        assert_eq!(
            ServerMode::from_flags(false, true, 8080),
            ServerMode::Http { port: 8080 }
        );
        assert_eq!(ServerMode::from_flags(true, true, 8080), ServerMode::Stdio);
    }
}
