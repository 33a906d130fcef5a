//! Resuming from a previously saved snapshot

use checkpointer::{CheckpointConfig, CheckpointState, FileEngine, PersistenceEngine};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct OptimizerState {
    lr: f64,
    momentum: f64,
    step: u64,
}

#[test]
#[serial]
fn test_fresh_instance_recovers_counter() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("resume.json");

    {
        let state = CheckpointState::builder(&path)
            .autosave_period(Duration::from_secs(3600))
            .field("counter", &0u64)
            .unwrap()
            .build()
            .unwrap();
        state.set("counter", &5u64).unwrap();
        state.interrupt();
        state.save().unwrap();
    }

    let resumed = CheckpointState::create(
        CheckpointConfig::new(&path)
            .autosave(false)
            .autosave_period(Duration::from_secs(12)),
    )
    .unwrap();

    assert_eq!(resumed.get("counter"), Some(json!(5)));
    assert_eq!(resumed.save_path(), path);
    assert_eq!(resumed.autosave_period(), Duration::from_secs(12));
}

#[test]
#[serial]
fn test_structured_fields_round_trip_through_yaml() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("optimizer.yaml");
    let optimizer = OptimizerState {
        lr: 0.25,
        momentum: 0.5,
        step: 1200,
    };

    let state = CheckpointState::builder(&path)
        .autosave(false)
        .field("optimizer", &optimizer)
        .unwrap()
        .build()
        .unwrap();
    state.save().unwrap();
    drop(state);

    let resumed = CheckpointState::builder(&path).autosave(false).build().unwrap();
    assert_eq!(resumed.get_as::<OptimizerState>("optimizer").unwrap(), optimizer);
}

#[test]
#[serial]
fn test_snapshot_with_ghost_and_reserved_keys() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("ghost.json");
    fs::write(
        &path,
        r#"{"ghost": 1, "autosave_enabled": true, "writing": true}"#,
    )
    .unwrap();

    let state = CheckpointState::builder(&path)
        .autosave(false)
        .field("counter", &3u64)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(state.get("ghost"), Some(json!(1)));
    assert_eq!(state.get("counter"), Some(json!(3)));
    assert!(!state.autosave_enabled());
    assert!(!state.contains("autosave_enabled"));
    assert!(!state.contains("writing"));

    state.save().unwrap();
    let saved = FileEngine::default().read(&path).unwrap().unwrap();
    assert_eq!(saved.len(), 2);
}
