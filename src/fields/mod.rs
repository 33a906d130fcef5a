//! Field storage for checkpointed state
//!
//! This module provides:
//! - The fixed set of control attribute names (`ControlField`, `ReservedNames`)
//! - The user field bag (`FieldStore`) that rejects those names

mod reserved;
mod store;


pub use reserved::{ControlField, ReservedNames};
pub use store::FieldStore;

/// Plain-data mapping persisted in a snapshot.
pub type Fields = std::collections::BTreeMap<String, serde_json::Value>;
