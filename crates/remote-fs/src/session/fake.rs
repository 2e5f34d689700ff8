//! In-memory `RemoteFs` used by the pool and service tests.
//!
//! Files and directories live in shared maps so a test can keep a handle and
//! inspect what an operation did after the session was moved into the pool.

use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::{copy_stream, EntryKind, LocalEnd, RemoteEntry, RemoteFs};
use crate::error::{Result, TransferError};
use crate::paths::parent_dir;
use crate::pool::Connector;
use crate::protocol::{ConnectionParams, Protocol};

#[derive(Default)]
pub(crate) struct FakeState {
    pub files: Mutex<BTreeMap<String, Vec<u8>>>,
    pub dirs: Mutex<BTreeSet<String>>,
    pub mkdir_log: Mutex<Vec<String>>,
    pub alive: AtomicBool,
    pub report_size: AtomicBool,
    pub closed: AtomicUsize,
}

impl FakeState {
    pub fn new() -> Arc<Self> {
        let state = Self::default();
        state.alive.store(true, Ordering::SeqCst);
        state.report_size.store(true, Ordering::SeqCst);
        state.dirs.lock().insert("/".to_string());
        Arc::new(state)
    }

    pub fn add_file(&self, path: &str, data: &[u8]) {
        self.files.lock().insert(path.to_string(), data.to_vec());
    }

    pub fn add_dir(&self, path: &str) {
        self.dirs.lock().insert(path.to_string());
    }
}

pub(crate) struct FakeSession {
    protocol: Protocol,
    state: Arc<FakeState>,
}

impl FakeSession {
    pub fn new(protocol: Protocol, state: Arc<FakeState>) -> Self {
        Self { protocol, state }
    }

    fn missing(path: &str) -> TransferError {
        TransferError::NotFound(format!("No such file: {}", path))
    }
}

impl RemoteFs for FakeSession {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn ping(&mut self) -> Result<()> {
        if self.state.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TransferError::SftpConnection("connection reset".into()))
        }
    }

    fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        if !self.state.dirs.lock().contains(path) {
            return Err(Self::missing(path));
        }
        let mut entries = Vec::new();
        for dir in self.state.dirs.lock().iter() {
            if dir != path && parent_dir(dir) == path {
                entries.push(RemoteEntry {
                    name: crate::paths::file_name(dir).to_string(),
                    kind: EntryKind::Directory,
                    size: 0,
                    permissions: "rwxr-xr-x".into(),
                    modified: "unknown".into(),
                });
            }
        }
        for (file, data) in self.state.files.lock().iter() {
            if parent_dir(file) == path {
                entries.push(RemoteEntry {
                    name: crate::paths::file_name(file).to_string(),
                    kind: EntryKind::File,
                    size: data.len() as u64,
                    permissions: "rw-r--r--".into(),
                    modified: "unknown".into(),
                });
            }
        }
        Ok(entries)
    }

    fn size(&mut self, path: &str) -> Result<Option<u64>> {
        if !self.state.report_size.load(Ordering::SeqCst) {
            return Err(TransferError::FtpPermanent("502 SIZE not implemented".into()));
        }
        self.state
            .files
            .lock()
            .get(path)
            .map(|d| Some(d.len() as u64))
            .ok_or_else(|| Self::missing(path))
    }

    fn read_to(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64> {
        let data = self
            .state
            .files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::missing(path))?;
        copy_stream(&mut data.as_slice(), sink, LocalEnd::Writer)
    }

    fn write_from(&mut self, path: &str, source: &mut dyn Read) -> Result<u64> {
        let parent = parent_dir(path);
        if !parent.is_empty() && !self.state.dirs.lock().contains(parent) {
            return Err(Self::missing(parent));
        }
        let mut data = Vec::new();
        let len = copy_stream(source, &mut data, LocalEnd::Reader)?;
        self.state.files.lock().insert(path.to_string(), data);
        Ok(len)
    }

    fn remove_file(&mut self, path: &str) -> Result<()> {
        self.state
            .files
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::missing(path))
    }

    fn remove_dir(&mut self, path: &str) -> Result<()> {
        if self.state.dirs.lock().remove(path) {
            Ok(())
        } else {
            Err(Self::missing(path))
        }
    }

    fn make_dir(&mut self, path: &str) -> Result<()> {
        self.state.mkdir_log.lock().push(path.to_string());
        let parent = parent_dir(path);
        if !parent.is_empty() && !self.state.dirs.lock().contains(parent) {
            return Err(Self::missing(parent));
        }
        if !self.state.dirs.lock().insert(path.to_string()) {
            return Err(TransferError::FtpPermanent(format!(
                "550 {}: File exists",
                path
            )));
        }
        Ok(())
    }

    fn is_dir(&mut self, path: &str) -> bool {
        self.state.dirs.lock().contains(path)
    }

    fn close(&mut self) {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Connector handing out fake sessions over one shared state
pub(crate) struct FakeConnector {
    pub state: Arc<FakeState>,
    pub connects: AtomicUsize,
    pub fail_with_auth: AtomicBool,
}

impl FakeConnector {
    pub fn new(state: Arc<FakeState>) -> Arc<Self> {
        Arc::new(Self {
            state,
            connects: AtomicUsize::new(0),
            fail_with_auth: AtomicBool::new(false),
        })
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl Connector for FakeConnector {
    fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn RemoteFs>> {
        if self.fail_with_auth.load(Ordering::SeqCst) {
            return Err(TransferError::SftpAuthentication);
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.state.alive.store(true, Ordering::SeqCst);
        Ok(Box::new(FakeSession::new(params.protocol, self.state.clone())))
    }
}
