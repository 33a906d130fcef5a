//! On-disk snapshot encodings

use std::path::Path;

use crate::error::{CheckpointError, Result};
use crate::fields::Fields;

/// Encoding used for a snapshot file, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotFormat {
    #[default]
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// `.yaml` / `.yml` select YAML; every other extension (or none) is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }

    pub fn encode(self, path: &Path, fields: &Fields) -> Result<Vec<u8>> {
        let encoded = match self {
            SnapshotFormat::Json => serde_json::to_vec_pretty(fields).map_err(|e| e.to_string()),
            SnapshotFormat::Yaml => serde_yaml::to_string(fields)
                .map(String::into_bytes)
                .map_err(|e| e.to_string()),
        };
        encoded.map_err(|message| CheckpointError::Encode {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn decode(self, path: &Path, bytes: &[u8]) -> Result<Fields> {
        let decoded = match self {
            SnapshotFormat::Json => {
                serde_json::from_slice::<Fields>(bytes).map_err(|e| e.to_string())
            }
            SnapshotFormat::Yaml => {
                serde_yaml::from_slice::<Fields>(bytes).map_err(|e| e.to_string())
            }
        };
        decoded.map_err(|message| CheckpointError::Decode {
            path: path.to_path_buf(),
            message,
        })
    }
}

impl std::fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotFormat::Json => write!(f, "json"),
            SnapshotFormat::Yaml => write!(f, "yaml"),
        }
    }
}
