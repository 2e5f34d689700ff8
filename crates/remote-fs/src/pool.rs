//! Connection cache
//!
//! Sessions are cached per (protocol, host, port, username) to avoid a login
//! on every tool call. A cached session is pinged before reuse; when the
//! ping fails it is closed, evicted, and replaced by a fresh login.

use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::protocol::{ConnectionKey, ConnectionParams, Protocol};
use crate::session::{FtpSession, RemoteFs, SftpSession};

/// A cached session; the inner lock serializes commands on one connection
pub type SharedSession = Arc<Mutex<Box<dyn RemoteFs>>>;

/// Opens new sessions for the pool
pub trait Connector: Send + Sync {
    fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn RemoteFs>>;
}

/// Connector that dials real FTP and SFTP servers
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkConnector;

impl Connector for NetworkConnector {
    fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn RemoteFs>> {
        match params.protocol {
            Protocol::Ftp => Ok(Box::new(FtpSession::connect(params)?)),
            Protocol::Sftp => Ok(Box::new(SftpSession::connect(params)?)),
        }
    }
}

/// In-process map from connection key to open session
pub struct ConnectionPool {
    connector: Arc<dyn Connector>,
    sessions: Mutex<HashMap<ConnectionKey, SharedSession>>,
}

impl ConnectionPool {
    /// Create a pool that dials real servers
    pub fn new() -> Self {
        Self::with_connector(Arc::new(NetworkConnector))
    }

    /// Create a pool with a custom connector
    pub fn with_connector(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Return a live session for `params`, reusing the cached one when its
    /// ping succeeds. Blocks on network I/O.
    pub fn acquire(&self, params: &ConnectionParams) -> Result<SharedSession> {
        let key = params.key();

        let cached = self.sessions.lock().get(&key).cloned();
        if let Some(session) = cached {
            let alive = session.lock().ping();
            match alive {
                Ok(()) => {
                    debug!("Reusing cached session {}", key);
                    return Ok(session);
                }
                Err(e) => {
                    warn!("Cached session {} failed ping ({}), reconnecting", key, e);
                    self.discard(&key, &session);
                }
            }
        }

        let fresh: SharedSession = Arc::new(Mutex::new(self.connector.connect(params)?));

        let winner = match self.sessions.lock().entry(key.clone()) {
            // A concurrent caller connected first; keep its session.
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => slot.insert(fresh.clone()).clone(),
        };

        if Arc::ptr_eq(&winner, &fresh) {
            info!("Opened session {}", key);
        } else {
            debug!("Closing duplicate session {}", key);
            fresh.lock().close();
        }
        Ok(winner)
    }

    /// Drop the cached session for `key`, closing it first
    pub fn evict(&self, key: &ConnectionKey) {
        let removed = self.sessions.lock().remove(key);
        if let Some(session) = removed {
            debug!("Evicting session {}", key);
            session.lock().close();
        }
    }

    /// Close and forget every cached session
    pub fn close_all(&self) {
        let drained: Vec<_> = self.sessions.lock().drain().collect();
        for (key, session) in drained {
            debug!("Closing session {}", key);
            session.lock().close();
        }
    }

    /// Number of cached sessions
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    fn discard(&self, key: &ConnectionKey, session: &SharedSession) {
        let mut sessions = self.sessions.lock();
        // Another caller may already have replaced the entry.
        if sessions
            .get(key)
            .map(|current| Arc::ptr_eq(current, session))
            .unwrap_or(false)
        {
            sessions.remove(key);
        }
        drop(sessions);
        session.lock().close();
    }
}

impl Default for ConnectionPool {
    fn default() -> Self {
        Self::new()
    }
}
