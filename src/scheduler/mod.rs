//! Periodic autosave scheduling
//!
//! A single worker thread sleeps for the autosave period, checks for a stop
//! request, and runs one save cycle. Stop requests are only observed between
//! cycles.

mod core;
mod state;


use std::time::Duration;

use crate::error::Result;

pub use self::core::Scheduler;
pub use self::state::SchedulerState;

/// Work performed by the scheduler on every cycle.
pub trait AutosaveTask: Send + Sync {
    /// Sleep between cycles. Read again before every sleep so period changes
    /// take effect on the next cycle.
    fn period(&self) -> Duration;

    /// One save cycle. Errors are logged by the scheduler and do not end the loop.
    fn run_cycle(&self) -> Result<()>;
}
