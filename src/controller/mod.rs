//! Coordination of manual saves, autosave toggling, and interrupts
//!
//! The controller owns the `autosave_enabled` flag and the scheduler. All
//! transitions happen under one control mutex, so the background task runs
//! exactly when autosave is enabled.

mod guard;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::scheduler::{AutosaveTask, Scheduler, SchedulerState};

pub use guard::WriteGuard;

/// A checkpoint target the controller can save and schedule.
pub trait GuardedTarget: AutosaveTask {
    fn write_guard(&self) -> &WriteGuard;

    /// Write the current fields under [`WriteGuard::guarded_save`].
    fn guarded_save(&self) -> Result<()>;
}

#[derive(Debug)]
pub struct InterruptController {
    autosave: Mutex<bool>,
    scheduler: Scheduler,
}

impl InterruptController {
    pub fn new() -> Self {
        Self {
            autosave: Mutex::new(false),
            scheduler: Scheduler::new(),
        }
    }

    fn control(&self) -> MutexGuard<'_, bool> {
        self.autosave.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn autosave_enabled(&self) -> bool {
        *self.control()
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Halt autosave and wait for in-flight writes.
    ///
    /// With autosave disabled this only logs a warning. Otherwise it returns
    /// once the worker has exited and no guarded save is running; no
    /// background write happens after that.
    pub fn interrupt<T: GuardedTarget + ?Sized>(&self, target: &T) {
        let mut enabled = self.control();
        if !*enabled {
            tracing::warn!("interrupt is a no-op: autosave is disabled");
            return;
        }
        self.halt(&mut enabled, target);
    }

    fn halt<T: GuardedTarget + ?Sized>(&self, enabled: &mut bool, target: &T) {
        self.scheduler.stop();
        self.scheduler.wait_stopped();
        target.write_guard().wait_idle();
        *enabled = false;
        tracing::info!("autosave interrupted");
    }

    /// Save now, switching autosave off first if it is on.
    ///
    /// The control lock is held through the write, so no scheduled save can
    /// start until this one has finished.
    pub fn manual_save<T: GuardedTarget + ?Sized>(&self, target: &T) -> Result<()> {
        let mut enabled = self.control();
        if *enabled {
            tracing::warn!("switching to manual save mode, autosave disabled");
            self.halt(&mut enabled, target);
        }
        target.guarded_save()
    }

    /// Toggle autosave. `true → false` interrupts, `false → true` starts the
    /// scheduler, and an unchanged value does nothing.
    pub fn set_autosave_enabled<T: GuardedTarget + 'static>(
        &self,
        target: &Arc<T>,
        value: bool,
    ) -> Result<()> {
        let mut enabled = self.control();
        if *enabled == value {
            return Ok(());
        }
        if value {
            let task: Arc<dyn AutosaveTask> = Arc::clone(target) as Arc<dyn AutosaveTask>;
            self.scheduler.start(task)?;
            *enabled = true;
            tracing::info!(
                period_secs = target.period().as_secs_f64(),
                "autosave enabled"
            );
        } else {
            self.halt(&mut enabled, target.as_ref());
        }
        Ok(())
    }

    /// Stop any running worker without logging a no-op warning.
    pub fn shutdown<T: GuardedTarget + ?Sized>(&self, target: &T) {
        let mut enabled = self.control();
        if *enabled {
            self.halt(&mut enabled, target);
        }
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}
