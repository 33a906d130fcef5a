//! Autosave timing and interrupt behaviour with the real file engine

use super::helpers::{modified_at, read_snapshot, wait_until};
use checkpointer::{CheckpointState, SchedulerState};
use serde_json::json;
use serial_test::serial;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[test]
#[serial]
fn test_autosave_tracks_counter_between_ticks() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("counter.json");

    let state = CheckpointState::builder(&path)
        .autosave_period(Duration::from_secs(1))
        .field("counter", &0u64)
        .unwrap()
        .build()
        .unwrap();

    thread::sleep(Duration::from_millis(2500));
    let first = read_snapshot(&path).expect("snapshot written after two ticks");
    assert_eq!(first["counter"], json!(0));

    state.set("counter", &1u64).unwrap();
    assert!(wait_until(Duration::from_millis(2500), || {
        read_snapshot(&path).is_some_and(|s| s["counter"] == json!(1))
    }));

    state.interrupt();
    assert!(!state.autosave_enabled());
}

#[test]
#[serial]
fn test_no_writes_after_interrupt_returns() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("quiet.json");

    let state = CheckpointState::builder(&path)
        .autosave_period(Duration::from_millis(30))
        .field("counter", &0u64)
        .unwrap()
        .build()
        .unwrap();
    assert!(wait_until(Duration::from_secs(2), || path.exists()));

    state.interrupt();
    assert_eq!(state.scheduler_state(), SchedulerState::Stopped);
    assert!(!state.is_writing());

    let content = std::fs::read_to_string(&path).unwrap();
    let modified = modified_at(&path);
    state.set("counter", &99u64).unwrap();
    thread::sleep(Duration::from_millis(200));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    assert_eq!(modified_at(&path), modified);
}

#[test]
#[serial]
fn test_interrupt_while_disabled_returns_quickly() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let state = CheckpointState::builder(temp.path().join("idle.json"))
        .autosave(false)
        .build()
        .unwrap();

    let started = Instant::now();
    state.interrupt();
    state.interrupt();

    assert!(started.elapsed() < Duration::from_millis(10));
    assert_eq!(state.scheduler_state(), SchedulerState::Idle);
}

#[test]
#[serial]
fn test_period_change_applies_to_next_cycle() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("period.json");

    let state = CheckpointState::builder(&path)
        .autosave_period(Duration::from_millis(40))
        .field("counter", &0u64)
        .unwrap()
        .build()
        .unwrap();
    assert!(wait_until(Duration::from_secs(2), || path.exists()));

    state.set_autosave_period(Duration::from_secs(3600)).unwrap();
    // Let any sleep started with the old period run out.
    thread::sleep(Duration::from_millis(150));
    let modified = modified_at(&path);
    state.set("counter", &7u64).unwrap();
    thread::sleep(Duration::from_millis(200));

    assert_eq!(modified_at(&path), modified);
    assert_eq!(read_snapshot(&path).unwrap()["counter"], json!(0));
    state.interrupt();
}
