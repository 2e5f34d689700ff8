//! MCP request handler

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::capabilities::ServerCapabilities;
use super::types::*;
use crate::tools::{ToolError, ToolProvider};

/// Handler for MCP requests
pub struct RequestHandler {
    /// Tools served by this process
    provider: Arc<dyn ToolProvider>,
    /// Server version
    server_version: String,
    /// Whether the session is initialized
    initialized: bool,
}

impl RequestHandler {
    /// Create a new request handler
    pub fn new(provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            provider,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Handle an incoming message
    pub async fn handle(&mut self, message: McpMessage) -> Option<McpMessage> {
        match (message.method.as_deref(), message.id.clone()) {
            (Some(method), Some(id)) => {
                debug!("Handling request: {}", method);

                let result = match method {
                    "initialize" => self.handle_initialize(message.params),
                    "ping" => Ok(serde_json::json!({})),
                    "tools/list" => self.handle_tools_list(),
                    "tools/call" => self.handle_tools_call(message.params).await,
                    _ => Err(McpError::method_not_found()),
                };

                Some(match result {
                    Ok(result) => McpMessage::response(id, result),
                    Err(error) => McpMessage::error_response(Some(id), error),
                })
            }
            (Some(method), None) => {
                match method {
                    "notifications/initialized" | "initialized" => {
                        info!("Client initialized");
                    }
                    "notifications/cancelled" => {
                        debug!("Request cancelled");
                    }
                    _ => {
                        debug!("Unknown notification: {}", method);
                    }
                }
                None
            }
            (None, _) => {
                // Responses are not expected in server mode
                debug!("Received unexpected response");
                None
            }
        }
    }

    /// Handle initialize request
    fn handle_initialize(&mut self, params: Option<Value>) -> Result<Value, McpError> {
        let params: InitializeParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::invalid_params(e.to_string()))?
            .unwrap_or(InitializeParams {
                protocol_version: None,
                capabilities: Value::Null,
                client_info: None,
            });

        match &params.client_info {
            Some(client) => info!(
                "Initializing session with client: {} v{} (protocol {})",
                client.name,
                client.version,
                params.protocol_version.as_deref().unwrap_or("unspecified")
            ),
            None => info!("Initializing session with unnamed client"),
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities::with_tools(),
            server_info: ServerInfo {
                name: self.provider.name().to_string(),
                version: self.server_version.clone(),
            },
        };

        serde_json::to_value(result).map_err(|e| McpError::internal_error(e.to_string()))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, McpError> {
        let result = ToolsListResult {
            tools: self.provider.tools(),
        };
        serde_json::to_value(result).map_err(|e| McpError::internal_error(e.to_string()))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: ToolCallParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::invalid_params(e.to_string()))?
            .ok_or_else(|| McpError::invalid_params("Missing params"))?;

        debug!("Calling tool: {}", params.name);

        let result = match self.provider.call(&params.name, params.arguments).await {
            Ok(tool_result) => tool_result,
            Err(ToolError::UnknownTool(name)) => {
                return Err(McpError::invalid_params(format!("Unknown tool: {}", name)));
            }
            Err(e) => {
                warn!("Tool {} rejected arguments: {}", params.name, e);
                ToolCallResult::error(e.to_string())
            }
        };

        serde_json::to_value(result).map_err(|e| McpError::internal_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolResult;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTools;

    #[async_trait]
    impl ToolProvider for EchoTools {
        fn name(&self) -> &str {
            "echo_mcp"
        }

        fn tools(&self) -> Vec<McpTool> {
            vec![McpTool {
                name: "echo".into(),
                description: Some("Echo the text argument".into()),
                input_schema: McpInputSchema::default(),
                annotations: None,
            }]
        }

        async fn call(&self, name: &str, arguments: Option<Value>) -> ToolResult<ToolCallResult> {
            match name {
                "echo" => {
                    let text = arguments
                        .as_ref()
                        .and_then(|a| a.get("text"))
                        .and_then(Value::as_str)
                        .ok_or_else(|| ToolError::InvalidInput("text: field required".into()))?;
                    Ok(ToolCallResult::text(text))
                }
                other => Err(ToolError::UnknownTool(other.to_string())),
            }
        }
    }

    fn handler() -> RequestHandler {
        RequestHandler::new(Arc::new(EchoTools))
    }

    #[tokio::test]
    async fn test_initialize_reports_provider_name() {
        let mut handler = handler();
        let response = handler
            .handle(McpMessage::request(
                1,
                "initialize",
                Some(json!({
                    "protocolVersion": MCP_VERSION,
                    "clientInfo": {"name": "test", "version": "1.0"}
                })),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "echo_mcp");
        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert!(handler.is_initialized());
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let mut handler = handler();
        let response = handler
            .handle(McpMessage::notification("notifications/initialized", None))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_tools_call_paths() {
        let mut handler = handler();

        let ok = handler
            .handle(McpMessage::request(
                2,
                "tools/call",
                Some(json!({"name": "echo", "arguments": {"text": "hi"}})),
            ))
            .await
            .unwrap();
        assert_eq!(ok.result.unwrap()["content"][0]["text"], "hi");

        let invalid = handler
            .handle(McpMessage::request(
                3,
                "tools/call",
                Some(json!({"name": "echo", "arguments": {}})),
            ))
            .await
            .unwrap();
        let result = invalid.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "Invalid input: text: field required");

        let unknown = handler
            .handle(McpMessage::request(
                4,
                "tools/call",
                Some(json!({"name": "nope"})),
            ))
            .await
            .unwrap();
        assert_eq!(unknown.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let mut handler = handler();
        let response = handler
            .handle(McpMessage::request(5, "resources/list", None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }
}
