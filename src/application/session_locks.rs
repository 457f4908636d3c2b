//! Per-session mutual exclusion for read-modify-write commands.
//!
//! Commands against the same session run one at a time; commands against
//! different sessions never contend. Lock entries are held weakly so the
//! table does not grow with every session ever touched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// Prune dead entries once the table grows past this many keys.
const PRUNE_THRESHOLD: usize = 128;

/// Guard held for the duration of one command's read-modify-write-publish.
pub type SessionGuard = OwnedMutexGuard<()>;

/// Keyed table of async mutexes, one per live session.
#[derive(Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<SessionId, Weak<AsyncMutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`.
    ///
    /// Waiters are served in FIFO order (tokio's mutex is fair).
    pub async fn acquire(&self, session_id: &SessionId) -> SessionGuard {
        let lock = self.lock_for(session_id);
        lock.lock_owned().await
    }

    /// Number of sessions with a live lock (held or awaited).
    #[cfg(test)]
    fn active_count(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.values().filter(|w| w.strong_count() > 0).count()
    }

    fn lock_for(&self, session_id: &SessionId) -> Arc<AsyncMutex<()>> {
        // The map lock is never held across an await point, so a poisoned
        // map still holds consistent data.
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());

        if locks.len() > PRUNE_THRESHOLD {
            locks.retain(|_, weak| weak.strong_count() > 0);
        }

        if let Some(existing) = locks.get(session_id).and_then(Weak::upgrade) {
            return existing;
        }

        let lock = Arc::new(AsyncMutex::new(()));
        locks.insert(session_id.clone(), Arc::downgrade(&lock));
        lock
    }
}
