//! Manual and scheduled saves racing on one destination

use super::helpers::{read_snapshot, wait_until, SlowChunkedEngine};
use checkpointer::CheckpointState;
use serde_json::json;
use serial_test::serial;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

#[test]
#[serial]
fn test_manual_save_during_scheduled_write_does_not_interleave() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("race.json");
    let engine = Arc::new(SlowChunkedEngine::new(Duration::from_millis(30)));

    let state = CheckpointState::builder(&path)
        .autosave_period(Duration::from_millis(20))
        .engine(engine.clone())
        .field("counter", &0u64)
        .unwrap()
        .field("payload", &"x".repeat(256))
        .unwrap()
        .build()
        .unwrap();

    assert!(wait_until(Duration::from_secs(2), || state.is_writing()));
    state.set("counter", &1u64).unwrap();
    state.save().unwrap();

    assert_eq!(engine.max_active(), 1);
    assert!(!state.autosave_enabled());
    let snapshot = read_snapshot(&path).expect("snapshot is complete JSON");
    assert_eq!(snapshot["counter"], json!(1));
    assert_eq!(snapshot["payload"], json!("x".repeat(256)));
}

#[test]
#[serial]
fn test_concurrent_manual_saves_are_serialized() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("many.json");
    let engine = Arc::new(SlowChunkedEngine::new(Duration::from_millis(5)));

    let state = Arc::new(
        CheckpointState::builder(&path)
            .autosave_period(Duration::from_millis(10))
            .engine(engine.clone())
            .field("counter", &0u64)
            .unwrap()
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..6u64)
        .map(|i| {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                state.set(format!("worker_{i}"), &i).unwrap();
                state.save().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.max_active(), 1);
    assert!(engine.saves() >= 6);
    let snapshot = read_snapshot(&path).expect("snapshot is complete JSON");
    for i in 0..6u64 {
        assert_eq!(snapshot[format!("worker_{i}")], json!(i));
    }
}

#[test]
#[serial]
fn test_final_save_reflects_writes_made_during_autosave() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("torn.json");
    let engine = Arc::new(SlowChunkedEngine::new(Duration::from_millis(2)));

    let state = Arc::new(
        CheckpointState::builder(&path)
            .autosave_period(Duration::from_millis(5))
            .engine(engine.clone())
            .field("a", &0u64)
            .unwrap()
            .field("b", &0u64)
            .unwrap()
            .build()
            .unwrap(),
    );

    let writer = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for i in 1..=200u64 {
                state.set("a", &i).unwrap();
                state.set("b", &i).unwrap();
            }
        })
    };
    writer.join().unwrap();
    state.save().unwrap();

    assert_eq!(engine.max_active(), 1);
    let snapshot = read_snapshot(&path).expect("snapshot is complete JSON");
    assert_eq!(snapshot["a"], json!(200));
    assert_eq!(snapshot["b"], json!(200));
}
