//! Builder for [`CheckpointState`]

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::CheckpointState;
use crate::config::CheckpointConfig;
use crate::error::{CheckpointError, Result};
use crate::persist::{PersistenceEngine, WriteDurability};

/// Builder-style construction mirroring [`CheckpointConfig`].
///
/// # Example
///
/// ```no_run
/// use checkpointer::CheckpointState;
/// use std::time::Duration;
///
/// let state = CheckpointState::builder("runs/mnist.json")
///     .autosave_period(Duration::from_secs(60))
///     .field("epoch", &0u64)?
///     .build()?;
///
/// while state.get_as::<u64>("epoch")? < 3 {
///     // ... train one epoch ...
///     state.update("epoch", |epoch: u64| epoch + 1)?;
/// }
///
/// state.interrupt();
/// state.save()?;
/// # Ok::<(), checkpointer::CheckpointError>(())
/// ```
pub struct CheckpointBuilder {
    config: CheckpointConfig,
    engine: Option<Arc<dyn PersistenceEngine>>,
}

impl CheckpointBuilder {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self::from_config(CheckpointConfig::new(save_path))
    }

    pub fn from_config(config: CheckpointConfig) -> Self {
        Self {
            config,
            engine: None,
        }
    }

    pub fn autosave_period(mut self, period: Duration) -> Self {
        self.config = self.config.autosave_period(period);
        self
    }

    pub fn autosave(mut self, enabled: bool) -> Self {
        self.config = self.config.autosave(enabled);
        self
    }

    pub fn force_restart(mut self, force: bool) -> Self {
        self.config = self.config.force_restart(force);
        self
    }

    pub fn durability(mut self, durability: WriteDurability) -> Self {
        self.config = self.config.durability(durability);
        self
    }

    /// Replace the default file engine.
    pub fn engine(mut self, engine: Arc<dyn PersistenceEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Add an initial field from any serializable value.
    pub fn field<T: Serialize + ?Sized>(mut self, name: impl Into<String>, value: &T) -> Result<Self> {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|source| CheckpointError::Conversion {
            name: name.clone(),
            source,
        })?;
        self.config = self.config.field(name, value);
        Ok(self)
    }

    pub fn build(self) -> Result<CheckpointState> {
        CheckpointState::with_engine(self.config, self.engine)
    }
}
