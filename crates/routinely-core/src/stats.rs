//! Daily summary across routines.

use serde::{Deserialize, Serialize};

use crate::routine::{Category, Routine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub total: usize,
    pub completed_today: usize,
    /// Sum of every routine's streak.
    pub total_streak: u64,
    /// Categories with at least one routine, morning first.
    pub by_category: Vec<CategorySummary>,
}

impl DaySummary {
    pub fn from_routines(routines: &[Routine]) -> Self {
        let by_category = group_by_category(routines)
            .into_iter()
            .map(|(category, group)| CategorySummary {
                category,
                total: group.len(),
                completed: group.iter().filter(|r| r.completed).count(),
            })
            .collect();

        Self {
            total: routines.len(),
            completed_today: routines.iter().filter(|r| r.completed).count(),
            total_streak: routines.iter().map(|r| u64::from(r.streak)).sum(),
            by_category,
        }
    }

    /// 0 .. 100 share of routines completed today.
    pub fn completion_pct(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed_today as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Group routines by time of day, keeping store order inside each group and
/// skipping empty categories.
pub fn group_by_category(routines: &[Routine]) -> Vec<(Category, Vec<&Routine>)> {
    Category::ALL
        .iter()
        .map(|&category| {
            let group: Vec<&Routine> = routines.iter().filter(|r| r.category == category).collect();
            (category, group)
        })
        .filter(|(_, group)| !group.is_empty())
        .collect()
}
