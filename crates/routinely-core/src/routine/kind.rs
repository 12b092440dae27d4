//! Closed classifications for routines: time-of-day category, repeat
//! frequency, and the routine kind that decides whether a routine needs a
//! journal entry or runs a meditation countdown.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Morning,
    Afternoon,
    Evening,
}

impl Category {
    /// Display order for grouped views.
    pub const ALL: [Category; 3] = [Category::Morning, Category::Afternoon, Category::Evening];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Morning => "Morning",
            Category::Afternoon => "Afternoon",
            Category::Evening => "Evening",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Morning => "🌅",
            Category::Afternoon => "☀️",
            Category::Evening => "🌙",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Morning => "morning",
            Category::Afternoon => "afternoon",
            Category::Evening => "evening",
        };
        f.write_str(s)
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Category::Morning),
            "afternoon" => Ok(Category::Afternoon),
            "evening" => Ok(Category::Evening),
            other => Err(ValidationError::invalid(
                "category",
                format!("expected morning, afternoon or evening, got '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "📅 Daily",
            Frequency::Weekly => "📆 Weekly",
            Frequency::Monthly => "🗓️ Monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(ValidationError::invalid(
                "frequency",
                format!("expected daily, weekly or monthly, got '{other}'"),
            )),
        }
    }
}

/// Journal routines that must carry a text entry before they count as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalKind {
    Gratitude,
    Planning,
    Affirmations,
}

const AFFIRMATION_EXAMPLES: [&str; 6] = [
    "I am capable of reaching every one of my goals",
    "Every day I become a better version of myself",
    "I attract abundance and success into my life",
    "I deserve happiness and success",
    "My self-confidence grows every day",
    "I am grateful for every opportunity that comes my way",
];

impl JournalKind {
    /// Placeholder shown in an empty entry field.
    pub fn prompt(&self) -> &'static str {
        match self {
            JournalKind::Gratitude => "What are you grateful for today?",
            JournalKind::Planning => "What are your priorities for tomorrow?",
            JournalKind::Affirmations => "Write your positive affirmations...",
        }
    }

    /// Hint shown when no entry has been written yet.
    pub fn call_to_action(&self) -> &'static str {
        match self {
            JournalKind::Gratitude => "express your gratitude",
            JournalKind::Planning => "plan tomorrow",
            JournalKind::Affirmations => "write your affirmations",
        }
    }

    pub fn examples(&self) -> &'static [&'static str] {
        match self {
            JournalKind::Affirmations => &AFFIRMATION_EXAMPLES,
            _ => &[],
        }
    }
}

/// What a routine is, fixed when it is created.
///
/// Serialized as a flat lowercase string (`standard`, `gratitude`,
/// `planning`, `affirmations`, `meditation`) so it reads naturally in TOML
/// templates and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoutineKind {
    #[default]
    Standard,
    Journal(JournalKind),
    Meditation,
}

impl RoutineKind {
    pub fn requires_input(&self) -> bool {
        matches!(self, RoutineKind::Journal(_))
    }

    pub fn is_meditation(&self) -> bool {
        matches!(self, RoutineKind::Meditation)
    }

    pub fn journal(&self) -> Option<JournalKind> {
        match self {
            RoutineKind::Journal(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoutineKind::Standard => "standard",
            RoutineKind::Journal(JournalKind::Gratitude) => "gratitude",
            RoutineKind::Journal(JournalKind::Planning) => "planning",
            RoutineKind::Journal(JournalKind::Affirmations) => "affirmations",
            RoutineKind::Meditation => "meditation",
        };
        f.write_str(s)
    }
}

impl FromStr for RoutineKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(RoutineKind::Standard),
            "gratitude" => Ok(RoutineKind::Journal(JournalKind::Gratitude)),
            "planning" => Ok(RoutineKind::Journal(JournalKind::Planning)),
            "affirmations" => Ok(RoutineKind::Journal(JournalKind::Affirmations)),
            "meditation" => Ok(RoutineKind::Meditation),
            other => Err(ValidationError::invalid(
                "kind",
                format!(
                    "expected standard, gratitude, planning, affirmations or meditation, got '{other}'"
                ),
            )),
        }
    }
}

impl TryFrom<String> for RoutineKind {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoutineKind> for String {
    fn from(kind: RoutineKind) -> Self {
        kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_journal_kinds_require_input() {
        assert!(!RoutineKind::Standard.requires_input());
        assert!(!RoutineKind::Meditation.requires_input());
        assert!(RoutineKind::Journal(JournalKind::Gratitude).requires_input());
        assert!(RoutineKind::Journal(JournalKind::Planning).requires_input());
        assert!(RoutineKind::Journal(JournalKind::Affirmations).requires_input());
    }

    #[test]
    fn kind_serializes_as_flat_string() {
        let json = serde_json::to_string(&RoutineKind::Journal(JournalKind::Planning)).unwrap();
        assert_eq!(json, "\"planning\"");
        let back: RoutineKind = serde_json::from_str("\"meditation\"").unwrap();
        assert_eq!(back, RoutineKind::Meditation);
        assert!(serde_json::from_str::<RoutineKind>("\"yoga\"").is_err());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Evening".parse::<Category>().unwrap(), Category::Evening);
        assert!("night".parse::<Category>().is_err());
    }

    #[test]
    fn only_affirmations_have_examples() {
        assert_eq!(JournalKind::Affirmations.examples().len(), 6);
        assert!(JournalKind::Gratitude.examples().is_empty());
    }
}
