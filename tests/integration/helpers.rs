//! Shared test helpers for checkpoint integration tests

use checkpointer::{Fields, FileEngine, PersistenceEngine};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

/// Read a JSON snapshot, or `None` if missing or unparsable.
pub fn read_snapshot(path: &Path) -> Option<serde_json::Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

/// Engine that writes the target in place, in slow chunks, so overlapping
/// writers would visibly interleave. Tracks the peak number of concurrent saves.
#[derive(Default)]
pub struct SlowChunkedEngine {
    pub chunk_delay: Duration,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub saves: AtomicUsize,
}

impl SlowChunkedEngine {
    pub fn new(chunk_delay: Duration) -> Self {
        Self {
            chunk_delay,
            ..Default::default()
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl PersistenceEngine for SlowChunkedEngine {
    fn save(&self, path: &Path, snapshot: &Fields) -> checkpointer::Result<()> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        let bytes = serde_json::to_vec_pretty(snapshot).expect("snapshot encodes");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .expect("open snapshot for writing");
        let chunk = bytes.len().div_ceil(4).max(1);
        for part in bytes.chunks(chunk) {
            file.write_all(part).expect("write chunk");
            file.flush().expect("flush chunk");
            thread::sleep(self.chunk_delay);
        }

        self.saves.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self, path: &Path) -> checkpointer::Result<Option<Fields>> {
        FileEngine::default().read(path)
    }
}
