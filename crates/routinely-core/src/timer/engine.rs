//! Meditation timer engine.
//!
//! A single-slot countdown. At most one routine is timed at a time; starting
//! another routine replaces the slot and the replaced run never completes.
//! The engine does not use internal threads - the caller (normally
//! [`TimerDriver`](crate::TimerDriver)) invokes `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Empty -> Running -> Empty        (expiry: MeditationCompleted, exactly once)
//!          Running -> Empty        (stop)
//!          Running -> Running'     (start for another routine: MeditationDiscarded)
//! ```
//!
//! Every `start` bumps a generation counter. A scheduled tick that carries
//! an old generation is ignored by [`MeditationTimer::tick_for`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format::format_time;
use crate::events::Event;
use crate::routine::{Routine, RoutineId};

/// The populated slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSlot {
    pub routine_id: RoutineId,
    pub time_left_secs: u64,
    pub total_secs: u64,
    pub is_running: bool,
    /// Informational only; the countdown is driven by ticks.
    pub started_at: DateTime<Utc>,
    pub generation: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeditationTimer {
    slot: Option<TimerSlot>,
    /// Generation handed to the most recent start.
    last_generation: u64,
}

impl MeditationTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn slot(&self) -> Option<&TimerSlot> {
        self.slot.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.slot.is_none()
    }

    pub fn active_routine(&self) -> Option<&str> {
        self.slot.as_ref().map(|s| s.routine_id.as_str())
    }

    pub fn is_running_for(&self, routine_id: &str) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|s| s.is_running && s.routine_id == routine_id)
    }

    /// Generation of the current run, if any.
    pub fn generation(&self) -> Option<u64> {
        self.slot.as_ref().map(|s| s.generation)
    }

    pub fn time_left_secs(&self) -> u64 {
        self.slot.as_ref().map(|s| s.time_left_secs).unwrap_or(0)
    }

    pub fn total_secs(&self) -> u64 {
        self.slot.as_ref().map(|s| s.total_secs).unwrap_or(0)
    }

    /// 0.0 .. 1.0 elapsed share of the current run.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.time_left_secs());
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn progress_percent(&self) -> u32 {
        (self.progress_fraction() * 100.0).round() as u32
    }

    pub fn formatted_time_left(&self) -> String {
        format_time(self.time_left_secs())
    }

    pub fn snapshot(&self) -> Event {
        Event::TimerSnapshot {
            routine_id: self.active_routine().map(str::to_owned),
            time_left_secs: self.time_left_secs(),
            total_secs: self.total_secs(),
            formatted: self.formatted_time_left(),
            progress_pct: self.progress_percent(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start timing `routine`, replacing whatever was in the slot.
    ///
    /// Returns no events (and changes nothing) when the routine is already
    /// completed or has no duration.
    pub fn start(&mut self, routine: &Routine) -> Vec<Event> {
        if routine.completed {
            tracing::warn!(routine_id = %routine.id, "not starting meditation for a completed routine");
            return Vec::new();
        }
        let total_secs = routine.duration_secs();
        if total_secs == 0 {
            tracing::warn!(routine_id = %routine.id, "not starting meditation with zero duration");
            return Vec::new();
        }

        let now = Utc::now();
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.slot.take() {
            tracing::debug!(
                routine_id = %previous.routine_id,
                time_left_secs = previous.time_left_secs,
                "discarding running meditation"
            );
            events.push(Event::MeditationDiscarded {
                routine_id: previous.routine_id,
                time_left_secs: previous.time_left_secs,
                at: now,
            });
        }

        self.last_generation = self.last_generation.wrapping_add(1);
        let generation = self.last_generation;
        self.slot = Some(TimerSlot {
            routine_id: routine.id.clone(),
            time_left_secs: total_secs,
            total_secs,
            is_running: true,
            started_at: now,
            generation,
        });
        tracing::debug!(routine_id = %routine.id, total_secs, generation, "meditation started");
        events.push(Event::MeditationStarted {
            routine_id: routine.id.clone(),
            total_secs,
            generation,
            at: now,
        });
        events
    }

    /// Clear the slot. Idempotent; returns an event only if a run was cancelled.
    pub fn stop(&mut self) -> Option<Event> {
        let slot = self.slot.take()?;
        tracing::debug!(routine_id = %slot.routine_id, "meditation stopped");
        Some(Event::MeditationStopped {
            routine_id: slot.routine_id,
            time_left_secs: slot.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::MeditationCompleted)` on the tick that reaches
    /// zero; the slot is cleared in the same step so later ticks are inert.
    pub fn tick(&mut self) -> Option<Event> {
        let slot = self.slot.as_mut()?;
        if !slot.is_running {
            return None;
        }
        slot.time_left_secs = slot.time_left_secs.saturating_sub(1);
        if slot.time_left_secs > 0 {
            return None;
        }

        let finished = self.slot.take()?;
        tracing::info!(routine_id = %finished.routine_id, "meditation completed");
        Some(Event::MeditationCompleted {
            routine_id: finished.routine_id,
            at: Utc::now(),
        })
    }

    /// Tick only if the slot still belongs to `generation`.
    pub fn tick_for(&mut self, generation: u64) -> Option<Event> {
        if self.generation() != Some(generation) {
            tracing::trace!(generation, "ignoring stale tick");
            return None;
        }
        self.tick()
    }
}
