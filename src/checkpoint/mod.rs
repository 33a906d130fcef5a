//! Checkpointed process state
//!
//! `CheckpointState` owns the user fields and the control attributes
//! (save path, autosave period, autosave flag). On construction it merges a
//! previously saved snapshot and starts the autosave worker if enabled.

mod builder;
mod core;


use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use self::core::CheckpointCore;
use crate::config::CheckpointConfig;
use crate::controller::{GuardedTarget, InterruptController};
use crate::error::{CheckpointError, Result};
use crate::fields::{FieldStore, Fields, ReservedNames};
use crate::persist::{FileEngine, PersistenceEngine};
use crate::scheduler::SchedulerState;

pub use builder::CheckpointBuilder;

/// Mutable process state persisted periodically to disk.
///
/// Fields are plain serde data. Reads and writes may happen from any thread
/// at any time; saves take a consistent copy of the fields.
///
/// Dropping the state stops the autosave worker (waiting for a write in
/// progress) but does not save. Call [`CheckpointState::save`] first.
pub struct CheckpointState {
    core: Arc<CheckpointCore>,
    controller: InterruptController,
}

impl CheckpointState {
    pub fn builder(save_path: impl Into<PathBuf>) -> CheckpointBuilder {
        CheckpointBuilder::new(save_path)
    }

    /// Construct from a config using the default file engine.
    pub fn create(config: CheckpointConfig) -> Result<Self> {
        Self::with_engine(config, None)
    }

    pub(crate) fn with_engine(
        config: CheckpointConfig,
        engine: Option<Arc<dyn PersistenceEngine>>,
    ) -> Result<Self> {
        config.validate()?;

        let engine: Arc<dyn PersistenceEngine> = match engine {
            Some(engine) => engine,
            None => Arc::new(FileEngine::new(config.durability)),
        };

        let store = FieldStore::new(ReservedNames::from_control_fields());
        for (name, value) in config.fields {
            store.set(name, value)?;
        }

        let core = Arc::new(CheckpointCore::new(
            store,
            engine,
            config.save_path,
            config.autosave_period,
        ));

        if config.force_restart {
            tracing::info!(path = %core.save_path().display(), "force restart, skipping load");
        } else {
            core.load();
        }

        let state = Self {
            core,
            controller: InterruptController::new(),
        };
        if config.autosave_enabled {
            state.set_autosave_enabled(true)?;
        }
        Ok(state)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.core.store.get(name)
    }

    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        self.core.store.get_as(name)
    }

    /// Store any serializable value, failing on reserved names.
    pub fn set<T: Serialize + ?Sized>(&self, name: impl Into<String>, value: &T) -> Result<()> {
        self.core.store.set_serialized(name, value)
    }

    pub fn set_value(&self, name: impl Into<String>, value: Value) -> Result<()> {
        self.core.store.set(name, value)
    }

    /// Atomically replace a typed field with `f(current)`.
    pub fn update<T, F>(&self, name: &str, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        self.core.store.update(name, f)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.core.store.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.core.store.contains(name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.core.store.names()
    }

    /// Copy of the fields as they would be persisted now.
    pub fn snapshot(&self) -> Fields {
        self.core.store.snapshot()
    }

    pub fn reserved_names(&self) -> &ReservedNames {
        self.core.store.reserved_names()
    }

    /// Manual save.
    ///
    /// Turns autosave off first if it is on, then writes synchronously.
    /// Write errors are returned to the caller.
    pub fn save(&self) -> Result<()> {
        self.controller.manual_save(self.core.as_ref())
    }

    /// Stop autosave, waiting for a write in progress to finish.
    ///
    /// No background write happens after this returns. Logs a warning and
    /// does nothing when autosave is already off.
    pub fn interrupt(&self) {
        self.controller.interrupt(self.core.as_ref());
    }

    pub fn autosave_enabled(&self) -> bool {
        self.controller.autosave_enabled()
    }

    pub fn set_autosave_enabled(&self, enabled: bool) -> Result<()> {
        self.controller.set_autosave_enabled(&self.core, enabled)
    }

    /// Merge the snapshot currently on disk into the fields.
    ///
    /// Returns false when there is nothing loadable at the save path.
    pub fn reload(&self) -> bool {
        self.core.load()
    }

    pub fn save_path(&self) -> PathBuf {
        self.core.save_path()
    }

    /// Change the destination used by subsequent saves.
    pub fn set_save_path(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(CheckpointError::InvalidConfig(
                "save_path must not be empty".to_string(),
            ));
        }
        self.core.set_save_path(path);
        Ok(())
    }

    pub fn autosave_period(&self) -> Duration {
        self.core.autosave_period()
    }

    /// Change the autosave period. A worker that is already sleeping picks
    /// the new value up after its current sleep.
    pub fn set_autosave_period(&self, period: Duration) -> Result<()> {
        if period.is_zero() {
            return Err(CheckpointError::InvalidConfig(
                "autosave period must be greater than zero".to_string(),
            ));
        }
        self.core.set_autosave_period(period);
        Ok(())
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.controller.scheduler_state()
    }

    /// True while a snapshot write holds the write guard.
    pub fn is_writing(&self) -> bool {
        self.core.write_guard().is_writing()
    }
}

impl Drop for CheckpointState {
    fn drop(&mut self) {
        self.controller.shutdown(self.core.as_ref());
    }
}

impl std::fmt::Debug for CheckpointState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckpointState")
            .field("save_path", &self.save_path())
            .field("autosave_period", &self.autosave_period())
            .field("autosave_enabled", &self.autosave_enabled())
            .field("fields", &self.field_names())
            .finish()
    }
}
