//! SFTP sessions over `ssh2`

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;

use ssh2::{ErrorCode, FileStat, Session, Sftp};
use tracing::info;

use super::{copy_stream, EntryKind, LocalEnd, RemoteEntry, RemoteFs};
use crate::display::format_permissions;
use crate::error::{Result, TransferError};
use crate::protocol::{ConnectionParams, Protocol};

// libssh2 session error codes
const LIBSSH2_ERROR_TIMEOUT: i32 = -9;
const LIBSSH2_ERROR_AUTHENTICATION_FAILED: i32 = -18;
const LIBSSH2_ERROR_PUBLICKEY_UNVERIFIED: i32 = -19;

// SFTP status codes
const LIBSSH2_FX_NO_SUCH_FILE: i32 = 2;
const LIBSSH2_FX_PERMISSION_DENIED: i32 = 3;
const LIBSSH2_FX_NO_SUCH_PATH: i32 = 10;

/// Authenticated SSH session with an open SFTP channel
pub struct SftpSession {
    session: Session,
    sftp: Sftp,
}

impl SftpSession {
    /// Connect, authenticate with the key file (preferred) or password, and
    /// open the SFTP subsystem.
    pub fn connect(params: &ConnectionParams) -> Result<Self> {
        let addr = params
            .address()
            .to_socket_addrs()
            .map_err(|e| TransferError::InvalidAddress(format!("{}: {}", params.address(), e)))?
            .next()
            .ok_or_else(|| TransferError::InvalidAddress(params.address()))?;

        info!("Connecting to {}", params.key());

        let tcp = TcpStream::connect_timeout(&addr, params.timeout)?;
        tcp.set_read_timeout(Some(params.timeout)).ok();
        tcp.set_write_timeout(Some(params.timeout)).ok();

        let mut session = Session::new().map_err(map_ssh_error)?;
        session.set_tcp_stream(tcp);
        session.set_timeout(params.timeout.as_millis().min(u32::MAX as u128) as u32);
        session.handshake().map_err(map_ssh_error)?;

        if let Some(key_file) = params.key_file.as_deref() {
            session
                .userauth_pubkey_file(&params.username, None, key_file, None)
                .map_err(map_ssh_error)?;
        } else if let Some(password) = params.password.as_ref() {
            session
                .userauth_password(&params.username, password.expose())
                .map_err(map_ssh_error)?;
        } else {
            return Err(TransferError::MissingCredentials);
        }

        if !session.authenticated() {
            return Err(TransferError::SftpAuthentication);
        }

        let sftp = session.sftp().map_err(map_ssh_error)?;
        Ok(Self { session, sftp })
    }

    fn stat(&self, path: &str) -> Result<FileStat> {
        self.sftp
            .stat(Path::new(path))
            .map_err(|e| map_path_error(e, path))
    }
}

impl RemoteFs for SftpSession {
    fn protocol(&self) -> Protocol {
        Protocol::Sftp
    }

    fn ping(&mut self) -> Result<()> {
        self.stat(".").map(|_| ())
    }

    fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        let entries = self
            .sftp
            .readdir(Path::new(path))
            .map_err(|e| map_path_error(e, path))?;

        Ok(entries
            .into_iter()
            .map(|(entry_path, stat)| {
                let name = entry_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| entry_path.to_string_lossy().into_owned());
                entry_from_stat(name, &stat)
            })
            .collect())
    }

    fn size(&mut self, path: &str) -> Result<Option<u64>> {
        Ok(self.stat(path)?.size)
    }

    fn read_to(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64> {
        let mut file = self
            .sftp
            .open(Path::new(path))
            .map_err(|e| map_path_error(e, path))?;
        copy_stream(&mut file, sink, LocalEnd::Writer)
    }

    fn write_from(&mut self, path: &str, source: &mut dyn Read) -> Result<u64> {
        let mut file = self
            .sftp
            .create(Path::new(path))
            .map_err(|e| map_path_error(e, path))?;
        copy_stream(source, &mut file, LocalEnd::Reader)
    }

    fn remove_file(&mut self, path: &str) -> Result<()> {
        self.sftp
            .unlink(Path::new(path))
            .map_err(|e| map_path_error(e, path))
    }

    fn remove_dir(&mut self, path: &str) -> Result<()> {
        self.sftp
            .rmdir(Path::new(path))
            .map_err(|e| map_path_error(e, path))
    }

    fn make_dir(&mut self, path: &str) -> Result<()> {
        self.sftp
            .mkdir(Path::new(path), 0o755)
            .map_err(|e| map_path_error(e, path))
    }

    fn is_dir(&mut self, path: &str) -> bool {
        self.stat(path).map(|s| s.is_dir()).unwrap_or(false)
    }

    fn close(&mut self) {
        let _ = self.session.disconnect(None, "closing", None);
    }
}

fn entry_from_stat(name: String, stat: &FileStat) -> RemoteEntry {
    let kind = if stat.perm.is_some() && stat.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };

    RemoteEntry {
        name,
        kind,
        size: stat.size.unwrap_or(0),
        permissions: stat
            .perm
            .map(format_permissions)
            .unwrap_or_else(|| "unknown".to_string()),
        modified: stat
            .mtime
            .and_then(format_mtime)
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

fn format_mtime(secs: u64) -> Option<String> {
    let secs = i64::try_from(secs).ok()?;
    chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Map an `ssh2` error onto the caller-facing categories
pub(crate) fn map_ssh_error(err: ssh2::Error) -> TransferError {
    match err.code() {
        ErrorCode::Session(LIBSSH2_ERROR_TIMEOUT) => TransferError::Timeout,
        ErrorCode::Session(LIBSSH2_ERROR_AUTHENTICATION_FAILED)
        | ErrorCode::Session(LIBSSH2_ERROR_PUBLICKEY_UNVERIFIED) => {
            TransferError::SftpAuthentication
        }
        ErrorCode::SFTP(LIBSSH2_FX_NO_SUCH_FILE) | ErrorCode::SFTP(LIBSSH2_FX_NO_SUCH_PATH) => {
            TransferError::NotFound(err.message().to_string())
        }
        ErrorCode::SFTP(LIBSSH2_FX_PERMISSION_DENIED) => {
            TransferError::PermissionDenied(err.message().to_string())
        }
        _ => TransferError::SftpConnection(err.to_string()),
    }
}

fn map_path_error(err: ssh2::Error, path: &str) -> TransferError {
    match map_ssh_error(err) {
        TransferError::NotFound(detail) => TransferError::NotFound(format!("{}: {}", detail, path)),
        TransferError::PermissionDenied(detail) => {
            TransferError::PermissionDenied(format!("{}: {}", detail, path))
        }
        other => other,
    }
}
