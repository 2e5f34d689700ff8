//! Remote sessions behind one blocking interface

mod ftp;
mod sftp;

#[cfg(test)]
pub(crate) mod fake;

use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

use crate::error::{Result, TransferError};
use crate::protocol::Protocol;

pub use ftp::{parse_list_line, FtpSession};
pub use sftp::SftpSession;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    pub permissions: String,
    pub modified: String,
}

impl RemoteEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Which end of a [`copy_stream`] is the caller's local file or buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalEnd {
    Reader,
    Writer,
}

/// Copy `from` into `to` until EOF.
///
/// Errors on the `local` end become [`TransferError::local`] so the session
/// stays cached; errors on the remote end keep their connection category.
pub fn copy_stream(from: &mut dyn Read, to: &mut dyn Write, local: LocalEnd) -> Result<u64> {
    let classify = |err: io::Error, failed: LocalEnd| {
        if failed == local {
            TransferError::local(err)
        } else {
            TransferError::from(err)
        }
    };

    let mut buffer = vec![0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = match from.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(classify(e, LocalEnd::Reader)),
        };
        to.write_all(&buffer[..n])
            .map_err(|e| classify(e, LocalEnd::Writer))?;
        total += n as u64;
    }
    to.flush().map_err(|e| classify(e, LocalEnd::Writer))?;
    Ok(total)
}

/// A logged-in FTP or SFTP session.
///
/// All methods block; callers run them on the blocking thread pool.
pub trait RemoteFs: Send {
    fn protocol(&self) -> Protocol;

    /// Cheap round trip proving the session is still usable
    fn ping(&mut self) -> Result<()>;

    fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Size of a remote file, `None` when the server does not report one
    fn size(&mut self, path: &str) -> Result<Option<u64>>;

    /// Stream a remote file into `sink`, returning the bytes copied
    fn read_to(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64>;

    /// Store `source` at `path`, replacing any existing file
    fn write_from(&mut self, path: &str, source: &mut dyn Read) -> Result<u64>;

    fn remove_file(&mut self, path: &str) -> Result<()>;

    /// Remove an empty directory
    fn remove_dir(&mut self, path: &str) -> Result<()>;

    fn make_dir(&mut self, path: &str) -> Result<()>;

    fn is_dir(&mut self, path: &str) -> bool;

    /// Best-effort logout; errors are ignored
    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))
        }
    }

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_copy_stream_counts_bytes() {
        let mut sink = Vec::new();
        let copied = copy_stream(&mut &b"hello world"[..], &mut sink, LocalEnd::Writer).unwrap();
        assert_eq!(copied, 11);
        assert_eq!(sink, b"hello world");
    }

    #[test]
    fn test_copy_stream_blames_the_failing_end() {
        let err = copy_stream(&mut &b"data"[..], &mut Broken, LocalEnd::Writer).unwrap_err();
        assert!(matches!(err, TransferError::LocalIo(_)));

        let err = copy_stream(&mut Broken, &mut Vec::new(), LocalEnd::Writer).unwrap_err();
        assert!(err.is_connection_failure());

        let err = copy_stream(&mut Broken, &mut Vec::new(), LocalEnd::Reader).unwrap_err();
        assert!(matches!(err, TransferError::LocalIo(_)));
    }
}
