//! Snapshot file I/O
//!
//! Snapshots are written to a temporary file in the destination directory and
//! renamed over the target, so readers see either the previous snapshot or the
//! new one, never a truncated file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use super::SnapshotFormat;
use crate::error::{CheckpointError, Result};
use crate::fields::Fields;

/// Storage backend for snapshots.
///
/// `save` must only be called while the caller holds the single-writer guard;
/// implementations do not serialize writers themselves.
pub trait PersistenceEngine: Send + Sync {
    /// Write `snapshot` to `path`, replacing any previous snapshot.
    fn save(&self, path: &Path, snapshot: &Fields) -> Result<()>;

    /// Strict read. A missing file is `Ok(None)`; unreadable or undecodable
    /// content is an error.
    fn read(&self, path: &Path) -> Result<Option<Fields>>;

    /// Lenient read used on startup and reload.
    ///
    /// Never fails: any read or decode error is logged and reported as "no
    /// snapshot" so a corrupt file degrades to a fresh start.
    fn load(&self, path: &Path) -> Option<Fields> {
        match self.read(path) {
            Ok(Some(fields)) => {
                tracing::info!(
                    path = %path.display(),
                    fields = fields.len(),
                    "loaded checkpoint"
                );
                Some(fields)
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no checkpoint to load");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "load failed, starting fresh");
                None
            }
        }
    }
}

/// How hard a save tries to reach stable storage before returning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteDurability {
    /// Temp file + rename, no fsync.
    BestEffort,

    /// Temp file is fsynced before the rename.
    #[default]
    Durable,
}

/// Default engine writing JSON or YAML files on the local filesystem.
#[derive(Debug, Default, Clone)]
pub struct FileEngine {
    durability: WriteDurability,
}

impl FileEngine {
    pub fn new(durability: WriteDurability) -> Self {
        Self { durability }
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }
}

impl PersistenceEngine for FileEngine {
    fn save(&self, path: &Path, snapshot: &Fields) -> Result<()> {
        let format = SnapshotFormat::from_path(path);
        let bytes = format.encode(path, snapshot)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CheckpointError::io(dir, e))?;
        let written = match tmp.write_all(&bytes) {
            Ok(()) => tmp.flush(),
            Err(e) => Err(e),
        };
        let synced = written.and_then(|()| match self.durability {
            WriteDurability::Durable => tmp.as_file().sync_all(),
            WriteDurability::BestEffort => Ok(()),
        });
        if let Err(e) = synced {
            return Err(CheckpointError::io(tmp.path(), e));
        }

        // On failure the temp file is dropped and removed with the error.
        tmp.persist(path)
            .map_err(|e| CheckpointError::io(path, e.error))?;

        tracing::info!(
            path = %path.display(),
            fields = snapshot.len(),
            format = %format,
            "checkpoint saved"
        );
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Option<Fields>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CheckpointError::io(path, e)),
        };
        SnapshotFormat::from_path(path)
            .decode(path, &bytes)
            .map(Some)
    }
}
