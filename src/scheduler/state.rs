//! Scheduler state machine shared between the owner and the worker thread

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Lifecycle of the background autosave task.
///
/// `Idle → Running → Stopping → Stopped`, and `Stopped → Running` again on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Never started
    Idle,
    /// Worker thread is sleeping or saving
    Running,
    /// Stop requested; worker exits at its next iteration boundary
    Stopping,
    /// Worker thread has exited
    Stopped,
}

impl SchedulerState {
    /// True while a worker thread may still be alive.
    pub fn is_active(self) -> bool {
        matches!(self, SchedulerState::Running | SchedulerState::Stopping)
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerState::Idle => write!(f, "idle"),
            SchedulerState::Running => write!(f, "running"),
            SchedulerState::Stopping => write!(f, "stopping"),
            SchedulerState::Stopped => write!(f, "stopped"),
        }
    }
}

/// State cell plus the condition variable signalled on every transition.
#[derive(Debug)]
pub(super) struct StateCell {
    state: Mutex<SchedulerState>,
    changed: Condvar,
}

impl StateCell {
    pub(super) fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState::Idle),
            changed: Condvar::new(),
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn get(&self) -> SchedulerState {
        *self.lock()
    }

    /// Set the state and wake every waiter.
    pub(super) fn set(&self, next: SchedulerState) {
        let mut state = self.lock();
        *state = next;
        self.changed.notify_all();
    }

    /// Move `Running → Stopping`. Returns false in any other state.
    pub(super) fn request_stop(&self) -> bool {
        let mut state = self.lock();
        if *state != SchedulerState::Running {
            return false;
        }
        *state = SchedulerState::Stopping;
        self.changed.notify_all();
        true
    }

    /// Block until no worker is active, returning the guard so the caller can
    /// transition atomically.
    pub(super) fn wait_inactive(&self) -> MutexGuard<'_, SchedulerState> {
        self.changed
            .wait_while(self.lock(), |state| state.is_active())
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Worker sleep between cycles.
    ///
    /// Returns true when a stop was requested before `period` elapsed (or
    /// at its end), false when the worker should run the next cycle.
    /// A period too large to represent as a deadline sleeps until stopped.
    pub(super) fn sleep_unless_stopped(&self, period: Duration) -> bool {
        let deadline = Instant::now().checked_add(period);
        let mut state = self.lock();
        loop {
            if *state != SchedulerState::Running {
                return true;
            }
            let Some(deadline) = deadline else {
                state = self
                    .changed
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            };
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .changed
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}
