use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routine::RoutineId;

/// Every state change in the system produces an Event.
/// Surfaces render from them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    MeditationStarted {
        routine_id: RoutineId,
        total_secs: u64,
        generation: u64,
        at: DateTime<Utc>,
    },
    /// A running meditation was replaced by a new one and will never complete.
    MeditationDiscarded {
        routine_id: RoutineId,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    MeditationStopped {
        routine_id: RoutineId,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. Emitted exactly once per run.
    MeditationCompleted {
        routine_id: RoutineId,
        at: DateTime<Utc>,
    },
    RoutineCompleted {
        routine_id: RoutineId,
        streak: u32,
        at: DateTime<Utc>,
    },
    RoutineReopened {
        routine_id: RoutineId,
        at: DateTime<Utc>,
    },
    JournalSaved {
        routine_id: RoutineId,
        chars: usize,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        routine_id: Option<RoutineId>,
        time_left_secs: u64,
        total_secs: u64,
        formatted: String,
        progress_pct: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The routine this event is about, if any.
    pub fn routine_id(&self) -> Option<&str> {
        match self {
            Event::MeditationStarted { routine_id, .. }
            | Event::MeditationDiscarded { routine_id, .. }
            | Event::MeditationStopped { routine_id, .. }
            | Event::MeditationCompleted { routine_id, .. }
            | Event::RoutineCompleted { routine_id, .. }
            | Event::RoutineReopened { routine_id, .. }
            | Event::JournalSaved { routine_id, .. } => Some(routine_id),
            Event::TimerSnapshot { routine_id, .. } => routine_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_snake_case() {
        let event = Event::MeditationCompleted {
            routine_id: "abc".into(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "meditation_completed");
        assert_eq!(json["routine_id"], "abc");
        assert_eq!(event.routine_id(), Some("abc"));
    }
}
