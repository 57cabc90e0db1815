// src/session.rs
//! Session provider seam. The managers never touch ambient storage directly;
//! whoever hosts the client injects one of these.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub role: String,
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn store(&self, session: &Session);
    fn clear(&self);
}

/// In-process store, the default for embedding and tests.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.inner.lock().expect("session lock poisoned").clone()
    }

    fn store(&self, session: &Session) {
        *self.inner.lock().expect("session lock poisoned") = Some(session.clone());
    }

    fn clear(&self) {
        *self.inner.lock().expect("session lock poisoned") = None;
    }
}

/// File-backed store used by the CLI so a session survives between commands.
/// Read/write failures are logged and treated as "no session" rather than
/// propagated; the caller will simply be asked to sign in again.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn store(&self, session: &Session) {
        let data = serde_json::to_string(session).expect("session serializes");
        if let Err(e) = std::fs::write(&self.path, data) {
            warn!("Failed to persist session to {}: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to remove session file {}: {}", self.path.display(), e);
            }
        }
    }
}
