//! HTTP/SSE transport for MCP

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::protocol::{McpMessage, RequestHandler};
use crate::tools::ToolProvider;

/// Shared state for HTTP handlers. Requests are serialized through the
/// handler lock.
struct AppState {
    handler: RwLock<RequestHandler>,
}

/// HTTP transport for MCP protocol
pub struct HttpTransport {
    provider: Arc<dyn ToolProvider>,
    port: u16,
}

impl HttpTransport {
    pub fn new(provider: Arc<dyn ToolProvider>, port: u16) -> Self {
        Self { provider, port }
    }

    /// Routes: `/` and `/health` (liveness), `POST /mcp`, `GET /mcp/sse`
    pub fn router(provider: Arc<dyn ToolProvider>) -> Router {
        let state = Arc::new(AppState {
            handler: RwLock::new(RequestHandler::new(provider)),
        });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(health))
            .route("/health", get(health))
            .route("/mcp", post(handle_mcp_request))
            .route("/mcp/sse", get(handle_mcp_sse))
            .layer(cors)
            .with_state(state)
    }

    /// Run the HTTP server
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = Self::router(self.provider.clone());

        let addr = format!("0.0.0.0:{}", self.port);
        info!("Starting MCP HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn health() -> &'static str {
    "OK"
}

/// One JSON-RPC message per POST; notifications get `202 Accepted`
async fn handle_mcp_request(
    State(state): State<Arc<AppState>>,
    Json(message): Json<McpMessage>,
) -> Response {
    debug!("HTTP request: {:?}", message.method);

    let mut handler = state.handler.write().await;

    match handler.handle(message).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Announces readiness; requests still go through `POST /mcp`
async fn handle_mcp_sse(
    State(_state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("SSE connection established");

    let stream = async_stream::stream! {
        yield Ok(Event::default().event("endpoint").data("/mcp"));
        yield Ok(Event::default().data(r#"{"status":"ready"}"#));
    };

    Sse::new(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{McpTool, ToolCallResult};
    use crate::tools::{ToolError, ToolResult};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Greeter;

    #[async_trait]
    impl ToolProvider for Greeter {
        fn name(&self) -> &str {
            "greeter_mcp"
        }

        fn tools(&self) -> Vec<McpTool> {
            Vec::new()
        }

        async fn call(&self, name: &str, _arguments: Option<Value>) -> ToolResult<ToolCallResult> {
            match name {
                "greet" => Ok(ToolCallResult::text("hello")),
                other => Err(ToolError::UnknownTool(other.to_string())),
            }
        }
    }

    async fn serve() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = HttpTransport::router(Arc::new(Greeter));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_routes() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let health = client.get(format!("{}/health", base)).send().await.unwrap();
        assert_eq!(health.status(), 200);
        assert_eq!(health.text().await.unwrap(), "OK");

        let response: Value = client
            .post(format!("{}/mcp", base))
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": {"name": "greet"}
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(response["id"], 7);
        assert_eq!(response["result"]["content"][0]["text"], "hello");

        let notification = client
            .post(format!("{}/mcp", base))
            .json(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .send()
            .await
            .unwrap();
        assert_eq!(notification.status(), 202);
    }
}
