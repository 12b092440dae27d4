//! Routine model.
//!
//! A [`Routine`] is a habit definition plus its mutable daily state
//! (`completed`, `streak`, `input_value`). Resetting `completed` at a day
//! boundary is left to whoever owns the store.

mod kind;
mod template;

pub use kind::{Category, Frequency, JournalKind, RoutineKind};
pub use template::{
    CustomRoutine, NewRoutine, ProgressionStep, RoutineTemplate, CUSTOM_DURATION_RANGE,
};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub type RoutineId = String;

/// Shown for goal-linked routines without a custom message.
pub const DEFAULT_ENCOURAGEMENT: &str = "Great job! You're getting closer to your goal!";

fn default_week() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: RoutineId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default = "template::default_icon")]
    pub icon: String,
    #[serde(default = "template::default_color")]
    pub color: String,
    /// Duration in minutes.
    pub duration_min: u32,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub kind: RoutineKind,

    #[serde(default)]
    pub is_progressive: bool,
    /// Current 1-based progression step.
    #[serde(default = "default_week")]
    pub week: u32,
    #[serde(default = "default_week")]
    pub max_weeks: u32,
    #[serde(default)]
    pub progression_steps: Vec<ProgressionStep>,

    #[serde(default)]
    pub is_goal_linked: bool,
    #[serde(default)]
    pub encouragement_message: Option<String>,

    #[serde(default)]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(default)]
    pub notifications_enabled: bool,

    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub input_value: Option<String>,
}

impl Routine {
    pub fn from_new(id: impl Into<RoutineId>, new: NewRoutine) -> Self {
        Self {
            id: id.into(),
            title: new.title,
            description: new.description,
            category: new.category,
            icon: new.icon,
            color: new.color,
            duration_min: new.duration_min,
            frequency: new.frequency,
            kind: new.kind,
            is_progressive: new.is_progressive,
            week: new.week,
            max_weeks: new.max_weeks,
            progression_steps: new.progression_steps,
            is_goal_linked: new.is_goal_linked,
            encouragement_message: new.encouragement_message,
            scheduled_time: new.scheduled_time,
            notifications_enabled: new.notifications_enabled,
            completed: false,
            streak: 0,
            input_value: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn requires_input(&self) -> bool {
        self.kind.requires_input()
    }

    pub fn is_meditation(&self) -> bool {
        self.kind.is_meditation()
    }

    /// True when a non-empty journal entry is stored.
    pub fn has_input(&self) -> bool {
        self.input_value.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Get duration in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration_min).saturating_mul(60)
    }

    pub fn current_step(&self) -> Option<&ProgressionStep> {
        let index = self.week.checked_sub(1)? as usize;
        self.progression_steps.get(index)
    }

    /// Encouragement to show once a goal-linked routine is done.
    pub fn encouragement<'a>(&'a self, fallback: &'a str) -> Option<&'a str> {
        if !(self.is_goal_linked && self.completed) {
            return None;
        }
        Some(self.encouragement_message.as_deref().unwrap_or(fallback))
    }

    /// "Week 2/6" style label for progressive routines.
    pub fn progress_label(&self) -> Option<String> {
        self.is_progressive
            .then(|| format!("Week {}/{}", self.week, self.max_weeks))
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Forward completion. Returns `false` if the routine was already done,
    /// in which case the streak is left alone.
    pub fn mark_completed(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.streak = self.streak.saturating_add(1);
        true
    }

    /// Manual undo. The streak is never decremented.
    pub fn mark_incomplete(&mut self) -> bool {
        if !self.completed {
            return false;
        }
        self.completed = false;
        true
    }

    /// Move to a progression step and take its duration and description.
    pub fn apply_week(&mut self, week: u32) -> Result<(), ValidationError> {
        let index = week.checked_sub(1).map(|w| w as usize);
        let step = index
            .and_then(|i| self.progression_steps.get(i))
            .ok_or_else(|| ValidationError::OutOfBounds {
                collection: "progression_steps".into(),
                index: week as usize,
                len: self.progression_steps.len(),
            })?;
        self.duration_min = step.duration_min;
        self.description = step.description.clone();
        self.week = week;
        Ok(())
    }

    /// Write duration and description back into the current step, so a
    /// later `apply_week` does not lose an edit.
    fn sync_current_step(&mut self) {
        let Some(index) = self.week.checked_sub(1) else {
            return;
        };
        if let Some(step) = self.progression_steps.get_mut(index as usize) {
            step.duration_min = self.duration_min;
            step.description.clone_from(&self.description);
        }
    }

    /// Apply a partial edit. Nothing is changed if validation fails.
    pub fn apply_update(&mut self, update: &RoutineUpdate) -> Result<(), ValidationError> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(ValidationError::invalid("title", "must not be empty"));
            }
        }
        if update.duration_min == Some(0) {
            return Err(ValidationError::invalid("duration_min", "must be positive"));
        }

        let mut next = self.clone();
        if let Some(week) = update.week {
            next.apply_week(week)?;
        }
        if let Some(title) = &update.title {
            next.title = title.clone();
        }
        if let Some(description) = &update.description {
            next.description = description.clone();
        }
        if let Some(duration) = update.duration_min {
            next.duration_min = duration;
        }
        if let Some(time) = update.scheduled_time {
            next.scheduled_time = time;
        }
        if let Some(enabled) = update.notifications_enabled {
            next.notifications_enabled = enabled;
        }
        if let Some(frequency) = update.frequency {
            next.frequency = frequency;
        }
        if let Some(message) = &update.encouragement_message {
            next.encouragement_message = message.clone();
        }
        next.sync_current_step();
        *self = next;
        Ok(())
    }
}

/// Partial edit of a routine. `None` leaves the field untouched; the nested
/// options allow clearing optional fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutineUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_min: Option<u32>,
    pub scheduled_time: Option<Option<NaiveTime>>,
    pub notifications_enabled: Option<bool>,
    pub frequency: Option<Frequency>,
    pub encouragement_message: Option<Option<String>>,
    pub week: Option<u32>,
}

impl RoutineUpdate {
    pub fn is_empty(&self) -> bool {
        *self == RoutineUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progressive() -> Routine {
        let template = RoutineTemplate {
            title: "Meditation".into(),
            description: String::new(),
            category: Category::Morning,
            color: template::default_color(),
            icon: "🧘".into(),
            kind: RoutineKind::Meditation,
            frequency: Frequency::Daily,
            is_progressive: true,
            progression_steps: vec![
                ProgressionStep { week: 1, duration_min: 5, description: "Breath".into() },
                ProgressionStep { week: 2, duration_min: 10, description: "Body".into() },
            ],
            is_goal_linked: false,
            encouragement_message: None,
        };
        Routine::from_new("r1", template.instantiate().unwrap())
    }

    #[test]
    fn completion_advances_streak_once() {
        let mut r = progressive();
        assert!(r.mark_completed());
        assert!(!r.mark_completed());
        assert_eq!(r.streak, 1);
    }

    #[test]
    fn undo_keeps_streak() {
        let mut r = progressive();
        r.mark_completed();
        assert!(r.mark_incomplete());
        assert!(!r.completed);
        assert_eq!(r.streak, 1);
        r.mark_completed();
        assert_eq!(r.streak, 2);
    }

    #[test]
    fn apply_week_reseeds_from_step() {
        let mut r = progressive();
        r.apply_week(2).unwrap();
        assert_eq!(r.duration_min, 10);
        assert_eq!(r.description, "Body");
        assert_eq!(r.current_step().map(|s| s.week), Some(2));
        assert!(r.apply_week(3).is_err());
        assert!(r.apply_week(0).is_err());
        assert_eq!(r.week, 2);
    }

    #[test]
    fn update_is_all_or_nothing() {
        let mut r = progressive();
        let bad = RoutineUpdate {
            title: Some("Renamed".into()),
            week: Some(9),
            ..Default::default()
        };
        assert!(r.apply_update(&bad).is_err());
        assert_eq!(r.title, "Meditation");

        let good = RoutineUpdate {
            week: Some(2),
            duration_min: Some(12),
            scheduled_time: Some(NaiveTime::from_hms_opt(7, 30, 0)),
            ..Default::default()
        };
        r.apply_update(&good).unwrap();
        assert_eq!(r.week, 2);
        assert_eq!(r.duration_min, 12);
        assert_eq!(r.scheduled_time, NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(r.current_step().map(|s| s.duration_min), Some(12));
    }

    #[test]
    fn edit_updates_current_step() {
        let mut r = progressive();
        let edit = RoutineUpdate {
            duration_min: Some(30),
            description: Some("Other".into()),
            ..Default::default()
        };
        r.apply_update(&edit).unwrap();

        let step = r.current_step().unwrap();
        assert_eq!(r.duration_min, step.duration_min);
        assert_eq!(r.description, step.description);
        assert_eq!(r.progression_steps[1].duration_min, 10);

        r.apply_week(2).unwrap();
        r.apply_week(1).unwrap();
        assert_eq!(r.duration_min, 30);
        assert_eq!(r.description, "Other");
    }

    #[test]
    fn encouragement_only_for_completed_goal_routines() {
        let mut r = progressive();
        r.is_goal_linked = true;
        assert_eq!(r.encouragement(DEFAULT_ENCOURAGEMENT), None);
        r.mark_completed();
        assert_eq!(r.encouragement(DEFAULT_ENCOURAGEMENT), Some(DEFAULT_ENCOURAGEMENT));
        r.encouragement_message = Some("One step closer".into());
        assert_eq!(r.encouragement(DEFAULT_ENCOURAGEMENT), Some("One step closer"));
    }

    #[test]
    fn empty_input_does_not_count() {
        let mut r = progressive();
        r.input_value = Some(String::new());
        assert!(!r.has_input());
        r.input_value = Some("sunshine".into());
        assert!(r.has_input());
    }
}
