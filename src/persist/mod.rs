//! Snapshot persistence
//!
//! This module provides:
//! - Snapshot encodings (`SnapshotFormat`)
//! - The storage seam (`PersistenceEngine`) and its file implementation

mod engine;
mod format;


pub use engine::{FileEngine, PersistenceEngine, WriteDurability};
pub use format::SnapshotFormat;
