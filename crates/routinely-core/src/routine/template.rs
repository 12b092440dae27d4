//! Routine definitions before they receive an id.
//!
//! A routine is created either from a [`RoutineTemplate`] (possibly
//! progressive, several weekly steps) or from a [`CustomRoutine`] (one step,
//! user supplied). Both produce a [`NewRoutine`] that a store turns into a
//! [`Routine`](super::Routine).

use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::kind::{Category, Frequency, RoutineKind};
use crate::error::{Result, ValidationError};

/// Bounds accepted for user-defined routine durations, in minutes.
pub const CUSTOM_DURATION_RANGE: std::ops::RangeInclusive<u32> = 5..=120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionStep {
    /// 1-based week this step applies to.
    pub week: u32,
    /// Duration in minutes.
    pub duration_min: u32,
    #[serde(default)]
    pub description: String,
}

/// A routine without an id, ready to be added to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoutine {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub icon: String,
    pub color: String,
    pub duration_min: u32,
    pub frequency: Frequency,
    pub kind: RoutineKind,
    pub is_progressive: bool,
    pub week: u32,
    pub max_weeks: u32,
    pub progression_steps: Vec<ProgressionStep>,
    pub is_goal_linked: bool,
    pub encouragement_message: Option<String>,
    pub scheduled_time: Option<NaiveTime>,
    pub notifications_enabled: bool,
}

/// Catalog entry a routine can be instantiated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineTemplate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub kind: RoutineKind,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub is_progressive: bool,
    pub progression_steps: Vec<ProgressionStep>,
    #[serde(default)]
    pub is_goal_linked: bool,
    #[serde(default)]
    pub encouragement_message: Option<String>,
}

pub(crate) fn default_color() -> String {
    "bg-purple-500".into()
}

pub(crate) fn default_icon() -> String {
    "⭐".into()
}

impl RoutineTemplate {
    /// Load a template from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid template.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let template: RoutineTemplate = toml::from_str(&content)?;
        Ok(template)
    }

    /// Seed a routine from the first progression step.
    pub fn instantiate(&self) -> Result<NewRoutine, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        let first = self
            .progression_steps
            .first()
            .ok_or_else(|| ValidationError::EmptyCollection("progression_steps".into()))?;
        if let Some(bad) = self.progression_steps.iter().find(|s| s.duration_min == 0) {
            return Err(ValidationError::invalid(
                "progression_steps",
                format!("week {} has a zero duration", bad.week),
            ));
        }

        Ok(NewRoutine {
            title: self.title.clone(),
            description: first.description.clone(),
            category: self.category,
            icon: self.icon.clone(),
            color: self.color.clone(),
            duration_min: first.duration_min,
            frequency: self.frequency,
            kind: self.kind,
            is_progressive: self.is_progressive,
            week: 1,
            max_weeks: self.progression_steps.len() as u32,
            progression_steps: self.progression_steps.clone(),
            is_goal_linked: self.is_goal_linked,
            encouragement_message: self.encouragement_message.clone(),
            scheduled_time: None,
            notifications_enabled: false,
        })
    }

    /// Human summary of how the routine evolves, e.g. "5 → 20 min".
    pub fn duration_summary(&self) -> String {
        match (self.progression_steps.first(), self.progression_steps.last()) {
            (Some(first), Some(last)) if self.is_progressive => {
                format!("{} → {} min", first.duration_min, last.duration_min)
            }
            (Some(first), _) => format!("{} min", first.duration_min),
            _ => String::new(),
        }
    }
}

/// User-defined routine with a single step.
#[derive(Debug, Clone)]
pub struct CustomRoutine {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub duration_min: u32,
    pub color: String,
    pub icon: String,
    pub kind: RoutineKind,
    pub frequency: Frequency,
    pub scheduled_time: Option<NaiveTime>,
    pub notifications_enabled: bool,
    pub is_goal_linked: bool,
    pub encouragement_message: Option<String>,
}

impl CustomRoutine {
    pub fn new(title: impl Into<String>, category: Category, duration_min: u32) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category,
            duration_min,
            color: default_color(),
            icon: default_icon(),
            kind: RoutineKind::Standard,
            frequency: Frequency::Daily,
            scheduled_time: None,
            notifications_enabled: false,
            is_goal_linked: false,
            encouragement_message: None,
        }
    }

    pub fn build(self) -> Result<NewRoutine, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        if !CUSTOM_DURATION_RANGE.contains(&self.duration_min) {
            return Err(ValidationError::invalid(
                "duration_min",
                format!(
                    "must be between {} and {} minutes, got {}",
                    CUSTOM_DURATION_RANGE.start(),
                    CUSTOM_DURATION_RANGE.end(),
                    self.duration_min
                ),
            ));
        }

        let step = ProgressionStep {
            week: 1,
            duration_min: self.duration_min,
            description: self.description.clone(),
        };
        Ok(NewRoutine {
            title: self.title,
            description: self.description,
            category: self.category,
            icon: self.icon,
            color: self.color,
            duration_min: self.duration_min,
            frequency: self.frequency,
            kind: self.kind,
            is_progressive: false,
            week: 1,
            max_weeks: 1,
            progression_steps: vec![step],
            is_goal_linked: self.is_goal_linked,
            encouragement_message: self.encouragement_message,
            scheduled_time: self.scheduled_time,
            notifications_enabled: self.notifications_enabled,
        })
    }
}
