//! Single-writer guard for snapshot writes

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::fields::FieldStore;
use crate::persist::PersistenceEngine;

/// Serializes every snapshot write in the process, manual or scheduled.
///
/// Concurrent callers queue on the mutex; no save is ever dropped.
#[derive(Debug, Default)]
pub struct WriteGuard {
    lock: Mutex<()>,
    writing: AtomicBool,
}

struct ClearOnDrop<'a>(&'a AtomicBool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl WriteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `store` and write it through `engine` while holding the guard.
    ///
    /// The snapshot is taken after the guard is acquired, so a queued save
    /// persists the fields as they are when its turn comes.
    pub fn guarded_save(
        &self,
        engine: &dyn PersistenceEngine,
        path: &Path,
        store: &FieldStore,
    ) -> Result<()> {
        let _held = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.writing.store(true, Ordering::SeqCst);
        let _clear = ClearOnDrop(&self.writing);

        let snapshot = store.snapshot();
        engine.save(path, &snapshot)
    }

    /// True while a guarded save holds the guard.
    pub fn is_writing(&self) -> bool {
        self.writing.load(Ordering::SeqCst)
    }

    /// Block until no guarded save is in flight.
    pub fn wait_idle(&self) {
        drop(self.lock.lock().unwrap_or_else(PoisonError::into_inner));
    }
}
