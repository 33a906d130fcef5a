//! Error types for checkpoint operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the checkpoint API.
///
/// Load failures never appear here: a corrupt or unreadable snapshot is
/// logged and treated as "no prior state".
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Attempt to write a field whose name belongs to a control attribute
    #[error("field name '{0}' is reserved for checkpoint control state")]
    ReservedName(String),

    /// Typed read of a field that does not exist
    #[error("field '{0}' not found")]
    NotFound(String),

    /// Field value could not be converted to or from the requested type
    #[error("field '{name}' could not be converted: {source}")]
    Conversion {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot for {}: {message}", .path.display())]
    Encode { path: PathBuf, message: String },

    #[error("failed to decode snapshot {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// Filesystem failure (unwritable destination, missing directory, full disk)
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid checkpoint configuration: {0}")]
    InvalidConfig(String),
}

impl CheckpointError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckpointError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CheckpointError> = std::result::Result<T, E>;
