//! Shared state reachable from both the caller and the autosave worker.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::controller::{GuardedTarget, WriteGuard};
use crate::error::Result;
use crate::fields::FieldStore;
use crate::persist::PersistenceEngine;
use crate::scheduler::AutosaveTask;

pub(super) struct CheckpointCore {
    pub(super) store: FieldStore,
    pub(super) engine: Arc<dyn PersistenceEngine>,
    pub(super) guard: WriteGuard,
    save_path: RwLock<PathBuf>,
    autosave_period: RwLock<Duration>,
}

impl CheckpointCore {
    pub(super) fn new(
        store: FieldStore,
        engine: Arc<dyn PersistenceEngine>,
        save_path: PathBuf,
        autosave_period: Duration,
    ) -> Self {
        Self {
            store,
            engine,
            guard: WriteGuard::new(),
            save_path: RwLock::new(save_path),
            autosave_period: RwLock::new(autosave_period),
        }
    }

    pub(super) fn save_path(&self) -> PathBuf {
        self.save_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn set_save_path(&self, path: PathBuf) {
        *self.save_path.write().unwrap_or_else(PoisonError::into_inner) = path;
    }

    pub(super) fn autosave_period(&self) -> Duration {
        *self
            .autosave_period
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn set_autosave_period(&self, period: Duration) {
        *self
            .autosave_period
            .write()
            .unwrap_or_else(PoisonError::into_inner) = period;
    }

    /// Merge the snapshot at the current save path into the store.
    pub(super) fn load(&self) -> bool {
        match self.engine.load(&self.save_path()) {
            Some(loaded) => {
                self.store.merge(loaded);
                true
            }
            None => false,
        }
    }
}

impl AutosaveTask for CheckpointCore {
    fn period(&self) -> Duration {
        self.autosave_period()
    }

    fn run_cycle(&self) -> Result<()> {
        self.guarded_save()
    }
}

impl GuardedTarget for CheckpointCore {
    fn write_guard(&self) -> &WriteGuard {
        &self.guard
    }

    fn guarded_save(&self) -> Result<()> {
        let path = self.save_path();
        self.guard
            .guarded_save(self.engine.as_ref(), &path, &self.store)
    }
}
