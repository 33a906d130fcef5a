//! Integration tests for checkpointer
//!
//! These tests drive `CheckpointState` through its public API with real
//! threads and real files, covering autosave timing, interrupt semantics,
//! and concurrent manual/scheduled saves.

pub mod autosave_flow;
pub mod concurrent_saves;
pub mod helpers;
pub mod recovery;
