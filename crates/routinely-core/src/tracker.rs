//! Per-surface routine tracker.
//!
//! Owns one store, one meditation timer slot and the "editing in progress"
//! marker. Every surface that shows routines holds its own tracker, so the
//! timer behaviour is defined once and shared.

use crate::error::{CoreError, Result, StoreError};
use crate::events::Event;
use crate::policy::CompletionPolicy;
use crate::routine::{NewRoutine, Routine, RoutineId, RoutineUpdate};
use crate::stats::DaySummary;
use crate::store::RoutineStore;
use crate::timer::MeditationTimer;

#[derive(Debug)]
pub struct RoutineTracker<S: RoutineStore> {
    store: S,
    timer: MeditationTimer,
    editing: Option<RoutineId>,
}

impl<S: RoutineStore> RoutineTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            timer: MeditationTimer::new(),
            editing: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn timer(&self) -> &MeditationTimer {
        &self.timer
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn routines(&self) -> Result<Vec<Routine>> {
        self.store.routines()
    }

    pub fn routine(&self, id: &str) -> Result<Routine> {
        self.store.get_routine(id)
    }

    /// Routine whose journal entry is being edited.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn can_toggle(&self, id: &str) -> Result<bool> {
        let routine = self.store.get_routine(id)?;
        Ok(CompletionPolicy::can_toggle(&routine, self.is_editing(id)))
    }

    pub fn formatted_time_left(&self) -> String {
        self.timer.formatted_time_left()
    }

    pub fn progress_fraction(&self) -> f64 {
        self.timer.progress_fraction()
    }

    pub fn summary(&self) -> Result<DaySummary> {
        Ok(DaySummary::from_routines(&self.store.routines()?))
    }

    fn is_editing(&self, id: &str) -> bool {
        self.editing.as_deref() == Some(id)
    }

    // ── Journal editing ──────────────────────────────────────────────

    /// Open the entry of `id` for editing, returning the current text to
    /// prefill. Only one routine is edited at a time.
    pub fn begin_editing(&mut self, id: &str) -> Result<String> {
        let routine = self.store.get_routine(id)?;
        self.editing = Some(routine.id);
        Ok(routine.input_value.unwrap_or_default())
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    // ── Completion ───────────────────────────────────────────────────

    pub fn toggle_complete(&mut self, id: &str) -> Result<Vec<Event>> {
        let editing = self.is_editing(id);
        CompletionPolicy::toggle_complete(&mut self.store, &mut self.timer, id, editing)
    }

    pub fn save_input_and_complete(&mut self, id: &str, text: &str) -> Result<Vec<Event>> {
        let events = CompletionPolicy::save_input_and_complete(&mut self.store, &mut self.timer, id, text)?;
        if self.is_editing(id) {
            self.editing = None;
        }
        Ok(events)
    }

    // ── Meditation ───────────────────────────────────────────────────

    /// Start the countdown for a pending meditation routine. Anything else
    /// is refused without changing state.
    pub fn start_meditation(&mut self, id: &str) -> Result<Vec<Event>> {
        let routine = self.store.get_routine(id)?;
        if !CompletionPolicy::can_start_meditation(&routine) {
            tracing::warn!(routine_id = id, "meditation start rejected");
            return Ok(Vec::new());
        }
        Ok(self.timer.start(&routine))
    }

    pub fn stop_meditation(&mut self) -> Option<Event> {
        self.timer.stop()
    }

    /// Advance the countdown by one second, completing the routine on expiry.
    pub fn tick(&mut self) -> Result<Vec<Event>> {
        let fired = self.timer.tick();
        self.finish_tick(fired)
    }

    /// Like [`tick`](Self::tick), ignored unless `generation` is current.
    pub fn tick_for(&mut self, generation: u64) -> Result<Vec<Event>> {
        let fired = self.timer.tick_for(generation);
        self.finish_tick(fired)
    }

    fn finish_tick(&mut self, fired: Option<Event>) -> Result<Vec<Event>> {
        let Some(expired) = fired else {
            return Ok(Vec::new());
        };
        let Event::MeditationCompleted { routine_id, .. } = &expired else {
            return Ok(vec![expired]);
        };
        let routine_id = routine_id.clone();
        match CompletionPolicy::complete_from_timer(&mut self.store, &routine_id) {
            Ok(completed) => Ok(std::iter::once(expired).chain(completed).collect()),
            // The routine went away under the countdown; the expiry still stands.
            Err(CoreError::Store(StoreError::NotFound(_))) => {
                tracing::warn!(routine_id = %routine_id, "meditation expired for a routine no longer in the store");
                Ok(vec![expired])
            }
            Err(e) => {
                tracing::error!(routine_id = %routine_id, error = %e, "meditation expired but completion failed");
                Err(e)
            }
        }
    }

    // ── Store passthrough ────────────────────────────────────────────

    pub fn add_routine(&mut self, new: NewRoutine) -> Result<Routine> {
        let routine = self.store.add_routine(new)?;
        tracing::info!(routine_id = %routine.id, title = %routine.title, "routine added");
        Ok(routine)
    }

    pub fn edit_routine(&mut self, id: &str, update: &RoutineUpdate) -> Result<Routine> {
        let routine = self.store.edit_routine(id, update)?;
        tracing::info!(routine_id = id, "routine edited");
        Ok(routine)
    }

    /// Delete a routine, cancelling its countdown and edit first.
    pub fn delete_routine(&mut self, id: &str) -> Result<(Routine, Option<Event>)> {
        let removed = self.store.delete_routine(id)?;
        let stopped = if self.timer.active_routine() == Some(id) {
            self.timer.stop()
        } else {
            None
        };
        if self.is_editing(id) {
            self.editing = None;
        }
        tracing::info!(routine_id = id, "routine deleted");
        Ok((removed, stopped))
    }
}
