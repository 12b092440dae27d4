//! Drives a shared tracker's meditation countdown in real time.
//!
//! The driver owns the tick schedule: `start` replaces it, `stop` and drop
//! cancel it. Ticks run under the tracker's mutex and carry the generation
//! of the run they were scheduled for, so a tick from a cancelled schedule
//! can never touch a newer run.
//!
//! Events produced by `start`/`stop` are returned to the caller. Events
//! produced by scheduled ticks (a snapshot every second, then the
//! completion) are sent on the channel returned by [`TimerDriver::new`].

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::Result;
use crate::events::Event;
use crate::store::RoutineStore;
use crate::timer::TickHandle;
use crate::tracker::RoutineTracker;

pub type SharedTracker<S> = Arc<Mutex<RoutineTracker<S>>>;

pub struct TimerDriver<S: RoutineStore + Send + 'static> {
    tracker: SharedTracker<S>,
    period: Duration,
    ticker: Option<TickHandle>,
    events: mpsc::UnboundedSender<Event>,
}

fn lock<S: RoutineStore>(tracker: &Mutex<RoutineTracker<S>>) -> MutexGuard<'_, RoutineTracker<S>> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: RoutineStore + Send + 'static> TimerDriver<S> {
    pub fn new(
        tracker: SharedTracker<S>,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let driver = Self {
            tracker,
            period,
            ticker: None,
            events,
        };
        (driver, rx)
    }

    pub fn tracker(&self) -> &SharedTracker<S> {
        &self.tracker
    }

    /// True while a tick schedule is alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start the countdown for `routine_id` and schedule its ticks.
    ///
    /// Must be called from within a tokio runtime. A refused start leaves
    /// the current run and its schedule untouched.
    pub fn start(&mut self, routine_id: &str) -> Result<Vec<Event>> {
        let (events, generation) = {
            let mut tracker = lock(&self.tracker);
            let events = tracker.start_meditation(routine_id)?;
            (events, tracker.timer().generation())
        };
        let Some(generation) = generation.filter(|_| !events.is_empty()) else {
            return Ok(events);
        };

        // Replacing the handle aborts the previous schedule.
        self.ticker = Some(self.spawn_ticker(generation));
        Ok(events)
    }

    /// Cancel the countdown without completing the routine.
    pub fn stop(&mut self) -> Option<Event> {
        self.ticker = None;
        lock(&self.tracker).stop_meditation()
    }

    /// Manual toggle through the driver, so the schedule is dropped along
    /// with a countdown the toggle cancels.
    pub fn toggle_complete(&mut self, routine_id: &str) -> Result<Vec<Event>> {
        let events = lock(&self.tracker).toggle_complete(routine_id)?;
        if lock(&self.tracker).timer().is_idle() {
            self.ticker = None;
        }
        Ok(events)
    }

    fn spawn_ticker(&self, generation: u64) -> TickHandle {
        let tracker = Arc::clone(&self.tracker);
        let events = self.events.clone();
        TickHandle::spawn(generation, self.period, move || {
            let mut guard = lock(&tracker);
            let fired = match guard.tick_for(generation) {
                Ok(fired) => fired,
                Err(e) => {
                    tracing::error!(generation, error = %e, "countdown completion failed");
                    return ControlFlow::Break(());
                }
            };

            let still_current = guard.timer().generation() == Some(generation);
            if still_current {
                // Receiver may be gone; the countdown keeps running regardless.
                let _ = events.send(guard.timer().snapshot());
            }
            drop(guard);

            for event in fired {
                let _ = events.send(event);
            }
            if still_current {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })
    }
}
