//! FTP/SFTP file tools served as `ftp_mcp`

mod format;
mod inputs;

use async_trait::async_trait;
use remote_fs::FileTransferService;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::protocol::{McpInputSchema, McpTool, ToolAnnotations, ToolCallResult};
use crate::tools::{
    definition, failure, parse_arguments, respond, ToolError, ToolProvider, ToolResult,
};

pub use inputs::{
    ConnectionArgs, CreateDirectoryInput, DeleteFileInput, DownloadFileInput,
    ListDirectoryInput, ReadFileInput, UploadFileInput,
};

const SERVER_NAME: &str = "ftp_mcp";

/// Tool names served by [`FtpTools`]
pub mod names {
    pub const LIST_DIRECTORY: &str = "ftp_list_directory";
    pub const UPLOAD_FILE: &str = "ftp_upload_file";
    pub const DOWNLOAD_FILE: &str = "ftp_download_file";
    pub const DELETE_FILE: &str = "ftp_delete_file";
    pub const CREATE_DIRECTORY: &str = "ftp_create_directory";
    pub const READ_FILE: &str = "ftp_read_file";
}

/// The six FTP/SFTP tools over a shared [`FileTransferService`]
pub struct FtpTools {
    service: FileTransferService,
    character_limit: usize,
    definitions: Vec<McpTool>,
}

impl FtpTools {
    pub fn new(service: FileTransferService, character_limit: usize) -> Self {
        let definitions = vec![
            definition(
                names::LIST_DIRECTORY,
                "List files and directories in a remote FTP or SFTP directory, \
                 with type, size, permissions, and modification time.",
                ListDirectoryInput::schema().build(),
                ToolAnnotations::read_only("List FTP/SFTP Directory"),
            ),
            definition(
                names::UPLOAD_FILE,
                "Upload a local file to an FTP or SFTP server. \
                 Missing parent directories on the server are created.",
                UploadFileInput::schema().build(),
                ToolAnnotations::mutating("Upload File via FTP/SFTP", false),
            ),
            definition(
                names::DOWNLOAD_FILE,
                "Download a file from an FTP or SFTP server to a local path.",
                DownloadFileInput::schema().build(),
                ToolAnnotations::mutating("Download File via FTP/SFTP", false),
            ),
            definition(
                names::DELETE_FILE,
                "Delete a file or an empty directory on an FTP or SFTP server. \
                 This cannot be undone.",
                DeleteFileInput::schema().build(),
                ToolAnnotations::destructive("Delete File/Directory via FTP/SFTP"),
            ),
            definition(
                names::CREATE_DIRECTORY,
                "Create a directory, including missing parents, on an FTP or SFTP server.",
                CreateDirectoryInput::schema().build(),
                ToolAnnotations::mutating("Create Directory via FTP/SFTP", true),
            ),
            definition(
                names::READ_FILE,
                "Read the text content of a remote file without downloading it. \
                 Not suitable for binary files.",
                ReadFileInput::schema(character_limit).build(),
                ToolAnnotations::read_only("Read File Content via FTP/SFTP"),
            ),
        ];

        Self {
            service,
            character_limit,
            definitions,
        }
    }

    pub fn service(&self) -> &FileTransferService {
        &self.service
    }

    fn schema_for(&self, name: &str) -> Option<&McpInputSchema> {
        self.definitions
            .iter()
            .find(|tool| tool.name == name)
            .map(|tool| &tool.input_schema)
    }

    async fn list_directory(&self, input: ListDirectoryInput) -> ToolCallResult {
        let params = input.connection.to_params();
        match self
            .service
            .list_directory(params, input.remote_path.clone())
            .await
        {
            Ok(entries) => respond(
                format::listing(&input.remote_path, &entries, input.response_format),
                self.character_limit,
            ),
            Err(e) => failure(e),
        }
    }

    async fn upload_file(&self, input: UploadFileInput) -> ToolCallResult {
        let params = input.connection.to_params();
        match self
            .service
            .upload_file(params, PathBuf::from(&input.local_path), input.remote_path)
            .await
        {
            Ok(receipt) => respond(format::uploaded(&receipt), self.character_limit),
            Err(e) => failure(e),
        }
    }

    async fn download_file(&self, input: DownloadFileInput) -> ToolCallResult {
        let params = input.connection.to_params();
        match self
            .service
            .download_file(params, input.remote_path, PathBuf::from(&input.local_path))
            .await
        {
            Ok(receipt) => respond(
                format::downloaded(&receipt, &input.local_path),
                self.character_limit,
            ),
            Err(e) => failure(e),
        }
    }

    async fn delete_file(&self, input: DeleteFileInput) -> ToolCallResult {
        let params = input.connection.to_params();
        match self
            .service
            .delete(params, input.remote_path.clone(), input.is_directory)
            .await
        {
            Ok(()) => respond(
                format::deleted(&input.remote_path, input.is_directory),
                self.character_limit,
            ),
            Err(e) => failure(e),
        }
    }

    async fn create_directory(&self, input: CreateDirectoryInput) -> ToolCallResult {
        let params = input.connection.to_params();
        match self.service.create_directory(params, input.remote_path).await {
            Ok(path) => respond(format::created(&path), self.character_limit),
            Err(e) => failure(e),
        }
    }

    async fn read_file(&self, input: ReadFileInput) -> ToolResult<ToolCallResult> {
        let max_size = input.effective_max_size(self.character_limit)?;
        let params = input.connection.to_params();
        Ok(
            match self
                .service
                .read_file(params, input.remote_path, input.encoding, max_size)
                .await
            {
                Ok(text) => respond(text, self.character_limit),
                Err(e) => failure(e),
            },
        )
    }
}

#[async_trait]
impl ToolProvider for FtpTools {
    fn name(&self) -> &str {
        SERVER_NAME
    }

    fn tools(&self) -> Vec<McpTool> {
        self.definitions.clone()
    }

    async fn call(&self, name: &str, arguments: Option<Value>) -> ToolResult<ToolCallResult> {
        let schema = self
            .schema_for(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        debug!("Running {}", name);

        let result = match name {
            names::LIST_DIRECTORY => self.list_directory(parse_arguments(schema, arguments)?).await,
            names::UPLOAD_FILE => self.upload_file(parse_arguments(schema, arguments)?).await,
            names::DOWNLOAD_FILE => self.download_file(parse_arguments(schema, arguments)?).await,
            names::DELETE_FILE => self.delete_file(parse_arguments(schema, arguments)?).await,
            names::CREATE_DIRECTORY => {
                self.create_directory(parse_arguments(schema, arguments)?)
                    .await
            }
            names::READ_FILE => self.read_file(parse_arguments(schema, arguments)?).await?,
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        if result.is_error() {
            warn!("{} failed: {}", name, result.joined_text());
        }
        Ok(result)
    }
}
