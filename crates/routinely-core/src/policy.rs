//! Completion policy.
//!
//! Decides whether a routine may be toggled and applies toggles and journal
//! saves against a store, coordinating with the meditation timer so a manual
//! completion cancels a countdown for the same routine instead of racing it.
//!
//! Rejected operations are not errors: they return an empty event list and
//! leave every piece of state untouched.

use chrono::Utc;

use crate::error::Result;
use crate::events::Event;
use crate::routine::Routine;
use crate::store::RoutineStore;
use crate::timer::MeditationTimer;

pub struct CompletionPolicy;

impl CompletionPolicy {
    /// A journal routine cannot be checked off while it has no entry, is
    /// not being edited and is not already completed. Unchecking is always
    /// allowed.
    pub fn can_toggle(routine: &Routine, editing: bool) -> bool {
        if !routine.requires_input() {
            return true;
        }
        routine.has_input() || editing || routine.completed
    }

    pub fn can_start_meditation(routine: &Routine) -> bool {
        routine.is_meditation() && !routine.completed
    }

    /// Flip `completed` for `routine_id`.
    ///
    /// A countdown running for the same routine is stopped first, so the
    /// only completion signal is the one produced here.
    pub fn toggle_complete<S: RoutineStore>(
        store: &mut S,
        timer: &mut MeditationTimer,
        routine_id: &str,
        editing: bool,
    ) -> Result<Vec<Event>> {
        let routine = store.get_routine(routine_id)?;
        if !Self::can_toggle(&routine, editing) {
            tracing::warn!(routine_id, "toggle rejected: journal entry required");
            return Ok(Vec::new());
        }

        let mut events = Vec::with_capacity(2);
        if timer.is_running_for(routine_id) {
            events.extend(timer.stop());
        }

        let now = Utc::now();
        if routine.completed {
            store.reopen_routine(routine_id)?;
            tracing::info!(routine_id, "routine reopened");
            events.push(Event::RoutineReopened {
                routine_id: routine_id.to_string(),
                at: now,
            });
        } else {
            let done = store.complete_routine(routine_id)?;
            tracing::info!(routine_id, streak = done.streak, "routine completed");
            events.push(Event::RoutineCompleted {
                routine_id: routine_id.to_string(),
                streak: done.streak,
                at: now,
            });
        }
        Ok(events)
    }

    /// Store the journal entry and mark the routine completed.
    ///
    /// Unlike a toggle this never un-completes, and re-saving the entry of
    /// a completed routine does not advance its streak again. A countdown
    /// running for the same routine is stopped first, as in
    /// [`toggle_complete`](Self::toggle_complete).
    pub fn save_input_and_complete<S: RoutineStore>(
        store: &mut S,
        timer: &mut MeditationTimer,
        routine_id: &str,
        text: &str,
    ) -> Result<Vec<Event>> {
        let before = store.update_routine_input(routine_id, text)?;
        let now = Utc::now();
        let mut events = Vec::with_capacity(3);
        if timer.is_running_for(routine_id) {
            events.extend(timer.stop());
        }
        events.push(Event::JournalSaved {
            routine_id: routine_id.to_string(),
            chars: text.chars().count(),
            at: now,
        });

        if !before.completed {
            let done = store.complete_routine(routine_id)?;
            tracing::info!(routine_id, streak = done.streak, "journal routine completed");
            events.push(Event::RoutineCompleted {
                routine_id: routine_id.to_string(),
                streak: done.streak,
                at: now,
            });
        }
        Ok(events)
    }

    /// Apply a countdown expiry reported by the timer.
    pub fn complete_from_timer<S: RoutineStore>(
        store: &mut S,
        routine_id: &str,
    ) -> Result<Option<Event>> {
        let routine = store.get_routine(routine_id)?;
        if routine.completed {
            return Ok(None);
        }
        let done = store.complete_routine(routine_id)?;
        Ok(Some(Event::RoutineCompleted {
            routine_id: routine_id.to_string(),
            streak: done.streak,
            at: Utc::now(),
        }))
    }
}
