pub mod checkpoint;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod fields;
pub mod logging;
pub mod persist;
pub mod scheduler;

pub use checkpoint::{CheckpointBuilder, CheckpointState};
pub use config::CheckpointConfig;
pub use error::{CheckpointError, Result};
pub use fields::Fields;
pub use persist::{FileEngine, PersistenceEngine, SnapshotFormat, WriteDurability};
pub use scheduler::SchedulerState;
