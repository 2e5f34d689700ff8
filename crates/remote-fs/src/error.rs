//! Error types for remote-fs

use std::io;

use thiserror::Error;

use crate::display::format_file_size;

/// Result type alias for transfer operations
pub type Result<T> = std::result::Result<T, TransferError>;

/// Transfer error types
///
/// The `Display` text is the message shown to tool callers; the tool layer
/// prefixes it with `Error: `.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("FTP permission denied - {0}")]
    FtpPermanent(String),

    #[error("FTP temporary error - {0}")]
    FtpTemporary(String),

    #[error("SFTP authentication failed. Check username and password.")]
    SftpAuthentication,

    #[error("SFTP connection error - {0}")]
    SftpConnection(String),

    #[error("File or directory not found - {0}")]
    NotFound(String),

    #[error("Permission denied - {0}")]
    PermissionDenied(String),

    #[error("Connection timeout. Please try again.")]
    Timeout,

    #[error("Local file not found: {0}")]
    LocalFileNotFound(String),

    #[error("{subject} size ({}) exceeds maximum allowed size ({})", human(.size), human(.limit))]
    TooLarge {
        subject: &'static str,
        size: u64,
        limit: u64,
    },

    #[error("Unable to decode file as {0}. File may be binary.")]
    Decode(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Either password or key_file must be provided")]
    MissingCredentials,

    #[error("InvalidAddress - {0}")]
    InvalidAddress(String),

    #[error("IOError - {0}")]
    Io(io::Error),

    /// Failure on the local side of a transfer; the remote session is unaffected
    #[error("IOError - {0}")]
    LocalIo(io::Error),

    #[error("{0}")]
    Other(String),
}

fn human(size: &u64) -> String {
    format_file_size(*size)
}

impl TransferError {
    pub fn too_large(subject: &'static str, size: u64, limit: u64) -> Self {
        Self::TooLarge {
            subject,
            size,
            limit,
        }
    }

    /// Classify an error raised by a local file or buffer
    pub fn local(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::LocalIo(err),
        }
    }

    /// Whether the failure says the session itself is unusable
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            Self::SftpConnection(_) | Self::Timeout | Self::Io(_)
        )
    }
}

impl From<io::Error> for TransferError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Io(err),
        }
    }
}
