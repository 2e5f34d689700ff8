//! # remote-fs
//!
//! File operations on remote FTP and SFTP servers for the `ftp_mcp` tool server:
//! - One blocking [`RemoteFs`] trait over `suppaftp` and `ssh2` sessions
//! - A connection cache keyed by protocol, host, port, and username
//! - Size-limited upload, download, and text read operations

pub mod display;
pub mod error;
pub mod paths;
pub mod pool;
pub mod protocol;
pub mod session;
mod service;

pub use display::{format_file_size, format_permissions};
pub use error::{Result, TransferError};
pub use pool::{ConnectionPool, Connector, NetworkConnector, SharedSession};
pub use protocol::{ConnectionKey, ConnectionParams, Protocol, Secret};
pub use service::{
    DownloadReceipt, FileTransferService, TextEncoding, TransferLimits, UploadReceipt,
    DEFAULT_MAX_FILE_SIZE,
};
pub use session::{EntryKind, RemoteEntry, RemoteFs};
