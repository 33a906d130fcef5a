//! Checkpoint configuration
//!
//! `CheckpointConfig` can be built in code or read from a TOML file:
//!
//! ```toml
//! save_path = "runs/mnist.json"
//! autosave_period_secs = 60.0
//! autosave_enabled = true
//! force_restart = false
//! durability = "durable"
//!
//! [fields]
//! epoch = 0
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CheckpointError;
use crate::fields::Fields;
use crate::persist::WriteDurability;

/// Default period between autosave cycles (15 minutes)
pub const DEFAULT_AUTOSAVE_PERIOD: Duration = Duration::from_secs(900);

/// Configuration for a [`crate::CheckpointState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointConfig {
    /// Snapshot location; the extension picks the encoding
    pub save_path: PathBuf,
    /// Time between background save cycles
    #[serde(
        rename = "autosave_period_secs",
        with = "period_secs",
        default = "default_period"
    )]
    pub autosave_period: Duration,
    /// Start the background save task on construction
    #[serde(default = "default_true")]
    pub autosave_enabled: bool,
    /// Skip loading an existing snapshot on construction
    #[serde(default)]
    pub force_restart: bool,
    #[serde(default)]
    pub durability: WriteDurability,
    /// Initial user fields, overwritten by a loaded snapshot
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub fields: Fields,
}

fn default_period() -> Duration {
    DEFAULT_AUTOSAVE_PERIOD
}

fn default_true() -> bool {
    true
}

impl CheckpointConfig {
    /// Create a config with defaults for everything but the path.
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
            autosave_period: DEFAULT_AUTOSAVE_PERIOD,
            autosave_enabled: true,
            force_restart: false,
            durability: WriteDurability::default(),
            fields: Fields::new(),
        }
    }

    pub fn autosave_period(mut self, period: Duration) -> Self {
        self.autosave_period = period;
        self
    }

    pub fn autosave(mut self, enabled: bool) -> Self {
        self.autosave_enabled = enabled;
        self
    }

    pub fn force_restart(mut self, force: bool) -> Self {
        self.force_restart = force;
        self
    }

    pub fn durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    /// Add an initial field. Reserved names are rejected later, on construction.
    pub fn field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Check values that would make the checkpoint unusable.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.save_path.as_os_str().is_empty() {
            return Err(CheckpointError::InvalidConfig(
                "save_path must not be empty".to_string(),
            ));
        }
        if self.autosave_period.is_zero() {
            return Err(CheckpointError::InvalidConfig(
                "autosave period must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse checkpoint config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

mod period_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(period: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(period.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
