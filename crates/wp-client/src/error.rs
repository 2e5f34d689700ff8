//! Error types for the WordPress client

use thiserror::Error;

/// Result type alias for WordPress operations
pub type Result<T> = std::result::Result<T, WpError>;

/// WordPress client error types
#[derive(Error, Debug)]
pub enum WpError {
    #[error("API request failed with status {status}. {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out. The WordPress site may be slow or unreachable.")]
    Timeout,

    #[error("Cannot connect to WordPress site. Check the URL and network connection.")]
    Connect,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File size exceeds maximum allowed ({0} bytes)")]
    FileTooLarge(u64),

    #[error("No fields provided to update")]
    NoFieldsToUpdate,

    #[error("Unexpected response - {0}")]
    InvalidResponse(String),

    #[error("HTTPError - {0}")]
    Http(reqwest::Error),

    #[error("IOError - {0}")]
    Io(#[from] std::io::Error),
}

impl WpError {
    /// Caller-facing message; `action` names what was attempted
    /// (e.g. `create post`) for permission failures.
    pub fn describe(&self, action: &str) -> String {
        match self {
            WpError::Status { status, body } => match status {
                401 => "Authentication failed. Check your username and application password."
                    .to_string(),
                403 => format!("Permission denied. You don't have rights to {}.", action),
                404 => "Resource not found. Check the ID or URL.".to_string(),
                409 => "Conflict. The resource may already exist.".to_string(),
                422 => format!("Invalid data provided. {}", body),
                429 => "Rate limit exceeded. Please wait before making more requests.".to_string(),
                _ => self.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for WpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WpError::Timeout
        } else if err.is_connect() {
            WpError::Connect
        } else {
            WpError::Http(err)
        }
    }
}
