//! FTP sessions over `suppaftp`

use std::io::{Read, Write};
use std::net::ToSocketAddrs;

use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, info};

use super::{copy_stream, EntryKind, LocalEnd, RemoteEntry, RemoteFs};
use crate::error::{Result, TransferError};
use crate::protocol::{ConnectionParams, Protocol};

/// Logged-in FTP control connection
pub struct FtpSession {
    stream: FtpStream,
}

impl FtpSession {
    /// Connect, log in, and switch to binary transfers
    pub fn connect(params: &ConnectionParams) -> Result<Self> {
        let addr = params
            .address()
            .to_socket_addrs()
            .map_err(|e| TransferError::InvalidAddress(format!("{}: {}", params.address(), e)))?
            .next()
            .ok_or_else(|| TransferError::InvalidAddress(params.address()))?;

        info!("Connecting to {}", params.key());

        let mut stream = FtpStream::connect_timeout(addr, params.timeout).map_err(map_ftp_error)?;
        stream.get_ref().set_read_timeout(Some(params.timeout)).ok();
        stream.get_ref().set_write_timeout(Some(params.timeout)).ok();

        let password = params.password.as_ref().map(|p| p.expose()).unwrap_or("");
        stream
            .login(params.username.as_str(), password)
            .map_err(map_ftp_error)?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(map_ftp_error)?;

        Ok(Self { stream })
    }
}

impl RemoteFs for FtpSession {
    fn protocol(&self) -> Protocol {
        Protocol::Ftp
    }

    fn ping(&mut self) -> Result<()> {
        self.stream.noop().map_err(map_ftp_error)
    }

    fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        // LIST runs inside the directory so servers that ignore a LIST
        // argument still return the right entries.
        let home = self.stream.pwd().map_err(map_ftp_error)?;
        self.stream.cwd(path).map_err(map_ftp_error)?;
        let lines = self.stream.list(None);
        let restored = self.stream.cwd(&home);

        let lines = lines.map_err(map_ftp_error)?;
        restored.map_err(map_ftp_error)?;

        debug!("LIST {} returned {} lines", path, lines.len());
        Ok(lines.iter().filter_map(|line| parse_list_line(line)).collect())
    }

    fn size(&mut self, path: &str) -> Result<Option<u64>> {
        let size = self.stream.size(path).map_err(map_ftp_error)?;
        Ok(Some(size as u64))
    }

    fn read_to(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64> {
        let mut data = self.stream.retr_as_stream(path).map_err(map_ftp_error)?;
        let copied = copy_stream(&mut data, sink, LocalEnd::Writer);
        // Read the transfer reply even after a local failure so the control
        // connection stays in sync.
        let finished = self.stream.finalize_retr_stream(data);
        let copied = copied?;
        finished.map_err(map_ftp_error)?;
        Ok(copied)
    }

    fn write_from(&mut self, path: &str, source: &mut dyn Read) -> Result<u64> {
        let mut data = self.stream.put_with_stream(path).map_err(map_ftp_error)?;
        let copied = copy_stream(source, &mut data, LocalEnd::Reader);
        let finished = self.stream.finalize_put_stream(data);
        let copied = copied?;
        finished.map_err(map_ftp_error)?;
        Ok(copied)
    }

    fn remove_file(&mut self, path: &str) -> Result<()> {
        self.stream.rm(path).map_err(map_ftp_error)
    }

    fn remove_dir(&mut self, path: &str) -> Result<()> {
        self.stream.rmdir(path).map_err(map_ftp_error)
    }

    fn make_dir(&mut self, path: &str) -> Result<()> {
        self.stream.mkdir(path).map_err(map_ftp_error)
    }

    fn is_dir(&mut self, path: &str) -> bool {
        let Ok(home) = self.stream.pwd() else {
            return false;
        };
        if self.stream.cwd(path).is_err() {
            return false;
        }
        let _ = self.stream.cwd(&home);
        true
    }

    fn close(&mut self) {
        let _ = self.stream.quit();
    }
}

/// Map an FTP client error onto the caller-facing categories: 4xx replies
/// are temporary, other server replies are permanent.
pub(crate) fn map_ftp_error(err: FtpError) -> TransferError {
    match err {
        FtpError::ConnectionError(io_err) => TransferError::from(io_err),
        FtpError::UnexpectedResponse(response) => {
            let code = response.status.code();
            let text = String::from_utf8_lossy(&response.body).trim().to_string();
            let reply = if text.is_empty() {
                code.to_string()
            } else if text.starts_with(&code.to_string()) {
                text
            } else {
                format!("{} {}", code, text)
            };
            if (400..500).contains(&code) {
                TransferError::FtpTemporary(reply)
            } else {
                TransferError::FtpPermanent(reply)
            }
        }
        FtpError::InvalidAddress(e) => TransferError::InvalidAddress(e.to_string()),
        other => TransferError::Other(format!("FtpError - {}", other)),
    }
}

/// Parse one Unix `ls -l` style LIST line.
///
/// The line is split into at most nine whitespace-separated fields so names
/// keep their inner spaces. Shorter lines (`total 12`, DOS listings) yield `None`.
pub fn parse_list_line(line: &str) -> Option<RemoteEntry> {
    let fields = split_fields(line, 9);
    if fields.len() < 9 {
        return None;
    }

    let permissions = fields[0];
    let size = fields[4].parse::<u64>().unwrap_or(0);
    let kind = if permissions.starts_with('d') {
        EntryKind::Directory
    } else {
        EntryKind::File
    };

    Some(RemoteEntry {
        name: fields[8].to_string(),
        kind,
        size,
        permissions: permissions.to_string(),
        modified: fields[5..8].join(" "),
    })
}

/// Split on runs of whitespace into at most `max` fields; the last field
/// keeps the remainder of the line verbatim, trailing whitespace included.
fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(max);
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        if fields.len() + 1 == max {
            fields.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}
