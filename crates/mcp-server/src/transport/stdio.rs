//! stdio transport: newline-delimited JSON-RPC on stdin/stdout

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::protocol::{McpError, McpMessage, RequestHandler};
use crate::tools::ToolProvider;

/// stdio transport for MCP protocol
pub struct StdioTransport {
    handler: RequestHandler,
}

impl StdioTransport {
    pub fn new(provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            handler: RequestHandler::new(provider),
        }
    }

    /// Serve stdin/stdout until EOF
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Starting MCP server on stdio");
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Process one message per line from `reader`, writing responses to `writer`.
    /// Messages are handled strictly in order.
    pub async fn serve<R, W>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                info!("EOF received, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!("Received: {}", trimmed);

            let response = match serde_json::from_str::<McpMessage>(trimmed) {
                Ok(message) => self.handler.handle(message).await,
                Err(e) => {
                    error!("Failed to parse message: {}", e);
                    Some(McpMessage::error_response(None, McpError::parse_error()))
                }
            };

            if let Some(response) = response {
                let response_line = serde_json::to_string(&response)?;
                debug!("Sending: {}", response_line);
                writer.write_all(response_line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{McpTool, ToolCallResult};
    use crate::tools::ToolResult;
    use async_trait::async_trait;
    use serde_json::Value;

    struct NoTools;

    #[async_trait]
    impl ToolProvider for NoTools {
        fn name(&self) -> &str {
            "empty_mcp"
        }

        fn tools(&self) -> Vec<McpTool> {
            Vec::new()
        }

        async fn call(&self, name: &str, _arguments: Option<Value>) -> ToolResult<ToolCallResult> {
            Err(crate::tools::ToolError::UnknownTool(name.to_string()))
        }
    }

    #[tokio::test]
    async fn test_line_protocol() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            "not json\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );
        let mut output = Vec::new();

        let mut transport = StdioTransport::new(Arc::new(NoTools));
        transport
            .serve(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["error"]["code"], -32700);
        assert_eq!(lines[2]["id"], 2);
        assert_eq!(lines[2]["result"]["tools"], serde_json::json!([]));
    }
}
