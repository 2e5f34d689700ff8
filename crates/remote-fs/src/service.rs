//! File transfer operations exposed by the `ftp_mcp` tools

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, TransferError};
use crate::paths::{ensure_parent_dirs, file_name, normalize_path};
use crate::pool::ConnectionPool;
use crate::protocol::{ConnectionParams, Protocol};
use crate::session::{RemoteEntry, RemoteFs};

/// 10 MiB upload/download ceiling
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Size limits applied to transfers
#[derive(Debug, Clone, Copy)]
pub struct TransferLimits {
    pub max_file_size: u64,
}

impl Default for TransferLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub file_name: String,
    pub size: u64,
    pub remote_path: String,
}

/// Result of a successful download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReceipt {
    pub file_name: String,
    pub size: u64,
    pub local_path: PathBuf,
}

/// Text encodings accepted by `read_file`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Ascii,
    Latin1,
}

impl TextEncoding {
    /// Decode `bytes`; `label` is the name the caller asked for
    pub fn decode(self, bytes: Vec<u8>, label: &str) -> Result<String> {
        match self {
            TextEncoding::Utf8 => {
                String::from_utf8(bytes).map_err(|_| TransferError::Decode(label.to_string()))
            }
            TextEncoding::Ascii => {
                if bytes.is_ascii() {
                    String::from_utf8(bytes).map_err(|_| TransferError::Decode(label.to_string()))
                } else {
                    Err(TransferError::Decode(label.to_string()))
                }
            }
            TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            _ => Err(TransferError::UnsupportedEncoding(s.to_string())),
        }
    }
}

/// In-memory sink that refuses to grow past `limit` bytes
struct CappedBuffer {
    data: Vec<u8>,
    limit: u64,
    /// Bytes offered so far, including a rejected write
    seen: u64,
}

impl CappedBuffer {
    fn new(limit: u64) -> Self {
        Self {
            data: Vec::new(),
            limit,
            seen: 0,
        }
    }

    fn overflowed(&self) -> bool {
        self.seen > self.limit
    }
}

impl Write for CappedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.seen += buf.len() as u64;
        if self.overflowed() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "read limit exceeded",
            ));
        }
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs the blocking FTP/SFTP work for each tool on tokio's blocking pool
#[derive(Clone)]
pub struct FileTransferService {
    pool: Arc<ConnectionPool>,
    limits: TransferLimits,
}

impl FileTransferService {
    pub fn new(pool: Arc<ConnectionPool>, limits: TransferLimits) -> Self {
        Self { pool, limits }
    }

    pub fn limits(&self) -> TransferLimits {
        self.limits
    }

    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// List the entries of a remote directory
    pub async fn list_directory(
        &self,
        params: ConnectionParams,
        remote_path: String,
    ) -> Result<Vec<RemoteEntry>> {
        self.with_session(params, move |fs| fs.list(&remote_path))
            .await
    }

    /// Upload a local file, creating missing remote parent directories
    pub async fn upload_file(
        &self,
        params: ConnectionParams,
        local_path: PathBuf,
        remote_path: String,
    ) -> Result<UploadReceipt> {
        let metadata = match tokio::fs::metadata(&local_path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => {
                return Err(TransferError::LocalFileNotFound(
                    local_path.display().to_string(),
                ))
            }
        };

        let size = metadata.len();
        let limit = self.limits.max_file_size;
        if size > limit {
            return Err(TransferError::too_large("File", size, limit));
        }

        let remote_path = normalize_path(&remote_path);
        let target = remote_path.clone();
        let source_path = local_path.clone();

        self.with_session(params, move |fs| {
            ensure_parent_dirs(fs, &target);
            let mut file = File::open(&source_path).map_err(TransferError::local)?;
            let written = fs.write_from(&target, &mut file)?;
            debug!("Stored {} bytes at {}", written, target);
            Ok(())
        })
        .await?;

        info!("Uploaded {} to {}", local_path.display(), remote_path);

        Ok(UploadReceipt {
            file_name: file_name(&local_path.to_string_lossy()).to_string(),
            size,
            remote_path,
        })
    }

    /// Download a remote file to a local path after checking its size
    pub async fn download_file(
        &self,
        params: ConnectionParams,
        remote_path: String,
        local_path: PathBuf,
    ) -> Result<DownloadReceipt> {
        let limit = self.limits.max_file_size;
        let destination = local_path.clone();

        self.with_session(params, move |fs| {
            if let Some(size) = fs.size(&remote_path)? {
                if size > limit {
                    return Err(TransferError::too_large("Remote file", size, limit));
                }
            }
            let mut file = File::create(&destination).map_err(TransferError::local)?;
            fs.read_to(&remote_path, &mut file)?;
            Ok(())
        })
        .await?;

        let size = tokio::fs::metadata(&local_path).await?.len();
        info!("Downloaded {} ({} bytes)", local_path.display(), size);

        Ok(DownloadReceipt {
            file_name: file_name(&local_path.to_string_lossy()).to_string(),
            size,
            local_path,
        })
    }

    /// Delete a remote file, or an empty remote directory
    pub async fn delete(
        &self,
        params: ConnectionParams,
        remote_path: String,
        is_directory: bool,
    ) -> Result<()> {
        self.with_session(params, move |fs| {
            if is_directory {
                fs.remove_dir(&remote_path)
            } else {
                fs.remove_file(&remote_path)
            }
        })
        .await
    }

    /// Create a remote directory (and any missing parents); returns the normalized path
    pub async fn create_directory(
        &self,
        params: ConnectionParams,
        remote_path: String,
    ) -> Result<String> {
        let remote_path = normalize_path(&remote_path);
        let target = remote_path.clone();

        self.with_session(params, move |fs| {
            ensure_parent_dirs(fs, &target);
            fs.make_dir(&target)
        })
        .await?;

        Ok(remote_path)
    }

    /// Read a remote text file of at most `max_size` bytes
    pub async fn read_file(
        &self,
        params: ConnectionParams,
        remote_path: String,
        encoding: String,
        max_size: u64,
    ) -> Result<String> {
        let text_encoding = TextEncoding::from_str(&encoding)?;

        let data = self
            .with_session(params, move |fs| {
                match fs.size(&remote_path) {
                    Ok(Some(size)) if size > max_size => {
                        return Err(TransferError::too_large("File", size, max_size));
                    }
                    Ok(_) => {}
                    // Not every FTP server implements SIZE
                    Err(e) if fs.protocol() == Protocol::Ftp => {
                        debug!("SIZE failed for {}: {}", remote_path, e)
                    }
                    Err(e) => return Err(e),
                }

                let mut sink = CappedBuffer::new(max_size);
                match fs.read_to(&remote_path, &mut sink) {
                    Ok(_) => Ok(sink.data),
                    Err(_) if sink.overflowed() => {
                        Err(TransferError::too_large("File", sink.seen, max_size))
                    }
                    Err(e) => Err(e),
                }
            })
            .await?;

        text_encoding.decode(data, &encoding)
    }

    /// Log out of every cached session. QUIT/disconnect block, so this runs
    /// on the blocking pool.
    pub async fn close_sessions(&self) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || pool.close_all())
            .await
            .map_err(|e| TransferError::Other(format!("Transfer task failed: {}", e)))
    }

    /// Acquire a session and run `op` on the blocking pool. Sessions that
    /// fail at the connection level are evicted so the next call reconnects.
    async fn with_session<F, T>(&self, params: ConnectionParams, op: F) -> Result<T>
    where
        F: FnOnce(&mut dyn RemoteFs) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let session = pool.acquire(&params)?;
            let result = {
                let mut guard = session.lock();
                op(&mut **guard)
            };
            if let Err(e) = &result {
                if e.is_connection_failure() {
                    pool.evict(&params.key());
                }
            }
            result
        })
        .await
        .map_err(|e| TransferError::Other(format!("Transfer task failed: {}", e)))?
    }
}

impl Default for FileTransferService {
    fn default() -> Self {
        Self::new(Arc::new(ConnectionPool::new()), TransferLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fake::{FakeConnector, FakeState};
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn service(state: &Arc<FakeState>, max_file_size: u64) -> FileTransferService {
        let connector = FakeConnector::new(state.clone());
        let pool = Arc::new(ConnectionPool::with_connector(connector));
        FileTransferService::new(pool, TransferLimits { max_file_size })
    }

    fn params() -> ConnectionParams {
        ConnectionParams::new(Protocol::Ftp, "ftp.example.com", "tester").with_password("pw")
    }

    #[tokio::test]
    async fn test_list_directory() {
        let state = FakeState::new();
        state.add_dir("/www");
        state.add_dir("/www/css");
        state.add_file("/www/index.php", b"<?php echo 1;");
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);

        let mut entries = svc.list_directory(params(), "/www".into()).await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "css");
        assert!(entries[0].is_dir());
        assert_eq!(entries[1].name, "index.php");
        assert_eq!(entries[1].size, 13);
    }

    #[tokio::test]
    async fn test_upload_creates_parent_dirs() {
        let state = FakeState::new();
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("report.txt");
        std::fs::write(&local, b"quarterly numbers").unwrap();

        let receipt = svc
            .upload_file(params(), local, "/backups//2024/q1/report.txt/".into())
            .await
            .unwrap();

        assert_eq!(receipt.file_name, "report.txt");
        assert_eq!(receipt.size, 17);
        assert_eq!(receipt.remote_path, "/backups/2024/q1/report.txt");
        assert_eq!(
            *state.mkdir_log.lock(),
            vec!["/backups", "/backups/2024", "/backups/2024/q1"]
        );
        assert_eq!(
            state.files.lock().get("/backups/2024/q1/report.txt").unwrap(),
            b"quarterly numbers"
        );
    }

    #[tokio::test]
    async fn test_upload_missing_local_file() {
        let state = FakeState::new();
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);

        let err = svc
            .upload_file(params(), PathBuf::from("/no/such/file.bin"), "/x.bin".into())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Local file not found: /no/such/file.bin");
    }

    #[tokio::test]
    async fn test_upload_rejects_oversize_file() {
        let state = FakeState::new();
        let svc = service(&state, 8);
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("big.bin");
        std::fs::write(&local, vec![0u8; 2048]).unwrap();

        let err = svc
            .upload_file(params(), local, "/big.bin".into())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "File size (2.00 KB) exceeds maximum allowed size (8.00 B)"
        );
        assert_eq!(state.files.lock().len(), 0);
    }

    #[tokio::test]
    async fn test_download_writes_local_file() {
        let state = FakeState::new();
        state.add_file("/data/dump.sql", b"CREATE TABLE t;");
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("dump.sql");

        let receipt = svc
            .download_file(params(), "/data/dump.sql".into(), local.clone())
            .await
            .unwrap();

        assert_eq!(receipt.size, 15);
        assert_eq!(receipt.file_name, "dump.sql");
        assert_eq!(std::fs::read(&local).unwrap(), b"CREATE TABLE t;");
    }

    #[tokio::test]
    async fn test_download_rejects_oversize_remote() {
        let state = FakeState::new();
        state.add_file("/huge.iso", &[1u8; 64]);
        let svc = service(&state, 32);
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("huge.iso");

        let err = svc
            .download_file(params(), "/huge.iso".into(), local.clone())
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Remote file size (64.00 B)"));
        assert!(!local.exists());
    }

    #[tokio::test]
    async fn test_delete_file_and_directory() {
        let state = FakeState::new();
        state.add_dir("/tmp");
        state.add_file("/tmp/old.zip", b"zip");
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);

        svc.delete(params(), "/tmp/old.zip".into(), false).await.unwrap();
        svc.delete(params(), "/tmp".into(), true).await.unwrap();

        assert!(state.files.lock().is_empty());
        assert!(!state.dirs.lock().contains("/tmp"));

        let err = svc
            .delete(params(), "/tmp/old.zip".into(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_directory_normalizes() {
        let state = FakeState::new();
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);

        let created = svc
            .create_directory(params(), "/projects//site/".into())
            .await
            .unwrap();

        assert_eq!(created, "/projects/site");
        assert!(state.dirs.lock().contains("/projects"));
        assert!(state.dirs.lock().contains("/projects/site"));
    }

    #[tokio::test]
    async fn test_read_file_decodes_text() {
        let state = FakeState::new();
        state.add_file("/etc/app.ini", "name=café".as_bytes());
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);

        let text = svc
            .read_file(params(), "/etc/app.ini".into(), "utf-8".into(), 25_000)
            .await
            .unwrap();
        assert_eq!(text, "name=café");

        let latin = svc
            .read_file(params(), "/etc/app.ini".into(), "latin-1".into(), 25_000)
            .await
            .unwrap();
        assert_eq!(latin.chars().count(), 10);
    }

    #[tokio::test]
    async fn test_read_file_limits_and_decode_errors() {
        let state = FakeState::new();
        state.add_file("/log.txt", &[b'a'; 100]);
        state.add_file("/image.png", &[0x89, 0x50, 0xff, 0xfe]);
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);

        let err = svc
            .read_file(params(), "/log.txt".into(), "utf-8".into(), 10)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "File size (100.00 B) exceeds maximum allowed size (10.00 B)"
        );

        // Without SIZE the read stops once the limit is passed
        state.report_size.store(false, Ordering::SeqCst);
        let err = svc
            .read_file(params(), "/log.txt".into(), "utf-8".into(), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::TooLarge { size: 100, limit: 10, .. }));
        state.report_size.store(true, Ordering::SeqCst);

        let err = svc
            .read_file(params(), "/image.png".into(), "utf-8".into(), 100)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to decode file as utf-8. File may be binary."
        );

        let err = svc
            .read_file(params(), "/log.txt".into(), "ebcdic".into(), 100)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported encoding: ebcdic");
    }

    #[tokio::test]
    async fn test_read_file_caps_buffer_without_size() {
        let state = FakeState::new();
        state.add_file("/big.log", &vec![b'x'; 200 * 1024]);
        state.report_size.store(false, Ordering::SeqCst);
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);

        let err = svc
            .read_file(params(), "/big.log".into(), "utf-8".into(), 1024)
            .await
            .unwrap_err();

        match err {
            TransferError::TooLarge { size, limit, .. } => {
                assert_eq!(limit, 1024);
                assert!(size > 1024 && size <= 64 * 1024);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The session survives the aborted read
        assert_eq!(svc.pool().len(), 1);
    }

    #[tokio::test]
    async fn test_read_file_sftp_stat_failure_surfaces() {
        let state = FakeState::new();
        state.add_file("/notes.txt", b"hello");
        state.report_size.store(false, Ordering::SeqCst);
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);
        let sftp = ConnectionParams::new(Protocol::Sftp, "ftp.example.com", "tester")
            .with_password("pw");

        let err = svc
            .read_file(sftp, "/notes.txt".into(), "utf-8".into(), 100)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "FTP permission denied - 502 SIZE not implemented");

        // FTP tolerates a missing SIZE command
        let text = svc
            .read_file(params(), "/notes.txt".into(), "utf-8".into(), 100)
            .await
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_local_io_error_keeps_cached_session() {
        let state = FakeState::new();
        state.add_dir("/");
        state.add_file("/a.txt", b"alpha");
        let connector = FakeConnector::new(state.clone());
        let pool = Arc::new(ConnectionPool::with_connector(connector.clone()));
        let svc = FileTransferService::new(pool.clone(), TransferLimits::default());
        let temp_dir = TempDir::new().unwrap();

        svc.list_directory(params(), "/".into()).await.unwrap();
        assert_eq!(pool.len(), 1);

        // The destination is a directory, so the local create fails
        let err = svc
            .download_file(params(), "/a.txt".into(), temp_dir.path().to_path_buf())
            .await
            .unwrap_err();
        assert!(!err.is_connection_failure());
        assert_eq!(pool.len(), 1);

        svc.list_directory(params(), "/".into()).await.unwrap();
        assert_eq!(connector.connects(), 1);
    }

    #[tokio::test]
    async fn test_close_sessions() {
        let state = FakeState::new();
        let svc = service(&state, DEFAULT_MAX_FILE_SIZE);
        svc.list_directory(params(), "/".into()).await.unwrap();
        assert_eq!(svc.pool().len(), 1);

        svc.close_sessions().await.unwrap();

        assert!(svc.pool().is_empty());
        assert_eq!(state.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_text_encoding_aliases() {
        assert_eq!("UTF8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("iso_8859_1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert_eq!("us-ascii".parse::<TextEncoding>().unwrap(), TextEncoding::Ascii);
        assert!(TextEncoding::Ascii.decode(vec![0xc3, 0xa9], "ascii").is_err());
    }
}
