//! Cancellable repeating schedule backing the 1 Hz countdown.
//!
//! A [`TickHandle`] owns one tokio task. Dropping or cancelling the handle
//! aborts the task, so no further ticks are delivered from it. Ticks that
//! are late (the runtime was busy) are delivered in a burst, keeping the
//! count of delivered ticks equal to elapsed periods of the monotonic clock.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub struct TickHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Call `on_tick` every `period`, first after one full period, until it
    /// returns `ControlFlow::Break` or the handle goes away.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(generation: u64, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let period = period.max(MIN_TICK_PERIOD);
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }
            tracing::trace!(generation, "tick schedule finished");
        });
        Self { generation, task }
    }

    /// Timer generation this schedule was created for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(self) {
        // Drop aborts the task.
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
