//! Tool providers for the FTP and WordPress servers

pub mod ftp;
mod schema;
mod validate;
pub mod wordpress;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::{McpInputSchema, McpTool, ToolAnnotations, ToolCallResult};

pub use ftp::FtpTools;
pub use schema::SchemaBuilder;
pub use validate::{parse_arguments, Validate};
pub use wordpress::WordPressTools;

/// Default cap on the length of any text returned to a client
pub const CHARACTER_LIMIT: usize = 25_000;

/// Result type alias for tool dispatch
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Errors raised before a tool reaches the remote system
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A set of tools served by one MCP server
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Server name reported during initialization
    fn name(&self) -> &str;

    /// Tool definitions for `tools/list`
    fn tools(&self) -> Vec<McpTool>;

    /// Run a tool. Remote failures come back as error results, not `Err`.
    async fn call(&self, name: &str, arguments: Option<Value>) -> ToolResult<ToolCallResult>;
}

/// Output format for listing tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Markdown,
    Json,
}

/// Assemble a tool definition for `tools/list`
pub(crate) fn definition(
    name: &str,
    description: &str,
    schema: McpInputSchema,
    annotations: ToolAnnotations,
) -> McpTool {
    McpTool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema: schema,
        annotations: Some(annotations),
    }
}

/// Error result with the `Error: ` prefix clients look for
pub fn failure(message: impl std::fmt::Display) -> ToolCallResult {
    ToolCallResult::error(format!("Error: {}", message))
}

/// Cut `text` to at most `limit` characters, appending a notice when cut
pub fn truncate_response(text: String, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text,
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push_str(&format!(
                "\n\n[Response truncated at {} characters]",
                limit
            ));
            truncated
        }
    }
}

/// Successful text result, truncated to `limit`
pub(crate) fn respond(text: String, limit: usize) -> ToolCallResult {
    ToolCallResult::text(truncate_response(text, limit))
}

/// Pretty JSON with two-space indentation
pub(crate) fn pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
