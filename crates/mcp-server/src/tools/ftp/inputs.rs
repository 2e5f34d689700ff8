//! Arguments accepted by the FTP tools

use remote_fs::{ConnectionParams, Protocol};
use serde::Deserialize;
use std::time::Duration;

use crate::tools::validate::{check_len, check_opt_len, check_opt_range, check_range};
use crate::tools::{ResponseFormat, SchemaBuilder, ToolResult, Validate};

const MAX_REMOTE_PATH: usize = 1000;

/// Connection fields shared by every FTP tool
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionArgs {
    pub protocol: Protocol,
    pub host: String,
    #[serde(default)]
    pub port: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub key_file: Option<String>,
    #[serde(default)]
    pub timeout: Option<i64>,
}

impl ConnectionArgs {
    /// Add the connection properties to a tool schema
    pub fn schema(builder: SchemaBuilder) -> SchemaBuilder {
        builder
            .enumeration(
                "protocol",
                "Protocol to use: 'ftp' or 'sftp'",
                &["ftp", "sftp"],
                true,
                None,
            )
            .string(
                "host",
                "FTP/SFTP server hostname or IP address (e.g., 'ftp.example.com', '192.168.1.100')",
                true,
                Some(1),
                Some(255),
            )
            .integer(
                "port",
                "Server port (default: 21 for FTP, 22 for SFTP)",
                false,
                Some(1),
                Some(65535),
                None,
            )
            .string("username", "Username for authentication", true, Some(1), Some(100))
            .string(
                "password",
                "Password for authentication (required for FTP, optional for SFTP with key)",
                false,
                None,
                Some(200),
            )
            .string(
                "key_file",
                "Path to SSH private key file for SFTP (alternative to password)",
                false,
                None,
                Some(500),
            )
            .integer(
                "timeout",
                "Connection timeout in seconds",
                false,
                Some(5),
                Some(300),
                Some(30),
            )
    }

    fn check(&self) -> ToolResult<()> {
        check_len("host", &self.host, 1, Some(255))?;
        check_opt_range("port", self.port, 1, Some(65535))?;
        check_len("username", &self.username, 1, Some(100))?;
        check_opt_len("password", self.password.as_deref(), 0, Some(200))?;
        check_opt_len("key_file", self.key_file.as_deref(), 0, Some(500))?;
        check_opt_range("timeout", self.timeout, 5, Some(300))
    }

    /// Session parameters; the port defaults per protocol
    pub fn to_params(&self) -> ConnectionParams {
        let mut params = ConnectionParams::new(self.protocol, self.host.as_str(), self.username.as_str());
        if let Some(port) = self.port.and_then(|p| u16::try_from(p).ok()) {
            params = params.with_port(port);
        }
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            params = params.with_password(password);
        }
        if let Some(key_file) = self.key_file.as_deref().filter(|k| !k.is_empty()) {
            params = params.with_key_file(key_file);
        }
        if let Some(timeout) = self.timeout.and_then(|t| u64::try_from(t).ok()) {
            params = params.with_timeout(Duration::from_secs(timeout));
        }
        params
    }
}

fn current_dir() -> String {
    ".".to_string()
}

fn utf8() -> String {
    "utf-8".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ListDirectoryInput {
    #[serde(flatten)]
    pub connection: ConnectionArgs,
    #[serde(default = "current_dir")]
    pub remote_path: String,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ListDirectoryInput {
    pub fn schema() -> SchemaBuilder {
        ConnectionArgs::schema(SchemaBuilder::new())
            .string_with_default(
                "remote_path",
                "Directory path to list (default: current directory, e.g., '/home/user', './documents')",
                ".",
            )
            .response_format()
    }
}

impl Validate for ListDirectoryInput {
    fn validate(&self) -> ToolResult<()> {
        self.connection.check()?;
        check_len("remote_path", &self.remote_path, 0, Some(MAX_REMOTE_PATH))
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadFileInput {
    #[serde(flatten)]
    pub connection: ConnectionArgs,
    pub local_path: String,
    pub remote_path: String,
}

impl UploadFileInput {
    pub fn schema() -> SchemaBuilder {
        ConnectionArgs::schema(SchemaBuilder::new())
            .string(
                "local_path",
                "Local file path to upload (e.g., '/home/user/document.pdf', './report.txt')",
                true,
                Some(1),
                Some(1000),
            )
            .string(
                "remote_path",
                "Remote destination path (e.g., '/uploads/document.pdf', './files/report.txt')",
                true,
                Some(1),
                Some(MAX_REMOTE_PATH),
            )
    }
}

impl Validate for UploadFileInput {
    fn validate(&self) -> ToolResult<()> {
        self.connection.check()?;
        check_len("local_path", &self.local_path, 1, Some(1000))?;
        check_len("remote_path", &self.remote_path, 1, Some(MAX_REMOTE_PATH))
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadFileInput {
    #[serde(flatten)]
    pub connection: ConnectionArgs,
    pub remote_path: String,
    pub local_path: String,
}

impl DownloadFileInput {
    pub fn schema() -> SchemaBuilder {
        ConnectionArgs::schema(SchemaBuilder::new())
            .string(
                "remote_path",
                "Remote file path to download (e.g., '/data/file.txt', './documents/report.pdf')",
                true,
                Some(1),
                Some(MAX_REMOTE_PATH),
            )
            .string(
                "local_path",
                "Local destination path (e.g., '/home/user/downloads/file.txt', './file.txt')",
                true,
                Some(1),
                Some(1000),
            )
    }
}

impl Validate for DownloadFileInput {
    fn validate(&self) -> ToolResult<()> {
        self.connection.check()?;
        check_len("remote_path", &self.remote_path, 1, Some(MAX_REMOTE_PATH))?;
        check_len("local_path", &self.local_path, 1, Some(1000))
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteFileInput {
    #[serde(flatten)]
    pub connection: ConnectionArgs,
    pub remote_path: String,
    #[serde(default)]
    pub is_directory: bool,
}

impl DeleteFileInput {
    pub fn schema() -> SchemaBuilder {
        ConnectionArgs::schema(SchemaBuilder::new())
            .string(
                "remote_path",
                "Remote file or directory path to delete (e.g., '/tmp/oldfile.txt', './backup/')",
                true,
                Some(1),
                Some(MAX_REMOTE_PATH),
            )
            .boolean(
                "is_directory",
                "Set to true if deleting a directory (directories must be empty)",
                false,
            )
    }
}

impl Validate for DeleteFileInput {
    fn validate(&self) -> ToolResult<()> {
        self.connection.check()?;
        check_len("remote_path", &self.remote_path, 1, Some(MAX_REMOTE_PATH))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDirectoryInput {
    #[serde(flatten)]
    pub connection: ConnectionArgs,
    pub remote_path: String,
}

impl CreateDirectoryInput {
    pub fn schema() -> SchemaBuilder {
        ConnectionArgs::schema(SchemaBuilder::new()).string(
            "remote_path",
            "Directory path to create (e.g., '/data/new_folder', './projects/project1')",
            true,
            Some(1),
            Some(MAX_REMOTE_PATH),
        )
    }
}

impl Validate for CreateDirectoryInput {
    fn validate(&self) -> ToolResult<()> {
        self.connection.check()?;
        check_len("remote_path", &self.remote_path, 1, Some(MAX_REMOTE_PATH))
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadFileInput {
    #[serde(flatten)]
    pub connection: ConnectionArgs,
    pub remote_path: String,
    #[serde(default = "utf8")]
    pub encoding: String,
    #[serde(default)]
    pub max_size: Option<i64>,
}

impl ReadFileInput {
    pub fn schema(character_limit: usize) -> SchemaBuilder {
        let limit = character_limit as i64;
        ConnectionArgs::schema(SchemaBuilder::new())
            .string(
                "remote_path",
                "Remote file path to read (e.g., '/data/file.txt', './documents/report.txt')",
                true,
                Some(1),
                Some(MAX_REMOTE_PATH),
            )
            .string_with_default("encoding", "File encoding (default: utf-8)", "utf-8")
            .integer(
                "max_size",
                "Maximum file size to read in bytes",
                false,
                Some(1),
                Some(limit),
                Some(limit),
            )
    }

    /// Range-check `max_size` against the configured limit; returns the effective value
    pub fn effective_max_size(&self, character_limit: usize) -> ToolResult<u64> {
        let limit = character_limit as i64;
        let max_size = self.max_size.unwrap_or(limit);
        check_range("max_size", max_size, 1, Some(limit))?;
        Ok(max_size as u64)
    }
}

impl Validate for ReadFileInput {
    fn validate(&self) -> ToolResult<()> {
        self.connection.check()?;
        check_len("remote_path", &self.remote_path, 1, Some(MAX_REMOTE_PATH))?;
        check_len("encoding", &self.encoding, 1, Some(50))
    }
}
