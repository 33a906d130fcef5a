//! Background autosave thread management.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use super::state::StateCell;
use super::{AutosaveTask, SchedulerState};
use crate::error::{CheckpointError, Result};

const WORKER_THREAD_NAME: &str = "checkpoint-autosave";

/// Owns at most one autosave worker thread.
pub struct Scheduler {
    cell: Arc<StateCell>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(StateCell::new()),
            handle: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.cell.get()
    }

    /// Start the periodic loop for `task`.
    ///
    /// Returns `Ok(false)` without spawning when a worker is already running.
    /// A worker that is still stopping is waited out first.
    pub fn start(&self, task: Arc<dyn AutosaveTask>) -> Result<bool> {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);

        if self.cell.get() == SchedulerState::Running {
            tracing::info!("autosave already running, start ignored");
            return Ok(false);
        }

        let mut state = self.cell.wait_inactive();
        if let Some(previous) = handle.take() {
            // Already past Stopped; joining only reaps the thread.
            if previous.join().is_err() {
                tracing::error!("previous autosave worker panicked");
            }
        }
        *state = SchedulerState::Running;
        drop(state);

        let cell = Arc::clone(&self.cell);
        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_autosave_loop(&cell, task.as_ref()));

        match spawned {
            Ok(worker) => {
                *handle = Some(worker);
                tracing::debug!("autosave worker started");
                Ok(true)
            }
            Err(e) => {
                self.cell.set(SchedulerState::Stopped);
                Err(CheckpointError::io(WORKER_THREAD_NAME, e))
            }
        }
    }

    /// Ask a running worker to exit at its next iteration boundary.
    ///
    /// Does not wait; a save already in progress runs to completion.
    pub fn stop(&self) -> bool {
        self.cell.request_stop()
    }

    /// Block until the worker has exited and been joined.
    pub fn wait_stopped(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        drop(self.cell.wait_inactive());
        if let Some(worker) = handle.take() {
            if worker.join().is_err() {
                tracing::error!("autosave worker panicked");
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state())
            .finish()
    }
}

/// Marks the scheduler stopped when the worker exits, including by panic.
struct StoppedOnExit<'a>(&'a StateCell);

impl Drop for StoppedOnExit<'_> {
    fn drop(&mut self) {
        self.0.set(SchedulerState::Stopped);
    }
}

fn run_autosave_loop(cell: &StateCell, task: &dyn AutosaveTask) {
    let _exit = StoppedOnExit(cell);
    let mut cycle: u64 = 0;

    loop {
        if cell.sleep_unless_stopped(task.period()) {
            break;
        }
        cycle += 1;
        match task.run_cycle() {
            Ok(()) => tracing::debug!(cycle, "autosave cycle complete"),
            Err(e) => {
                tracing::warn!(cycle, error = %e, "autosave cycle failed, retrying next period");
            }
        }
    }

    tracing::debug!(cycles = cycle, "autosave worker stopped");
}
