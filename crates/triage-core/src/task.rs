//! Task type and priority tiers.
//!
//! A task carries two user-supplied scores (urgency, importance) and a due
//! date. From the due date and a reference date the engine derives
//! `days_left` and `time_factor`, the time-pressure inputs to clustering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority tier assigned to a task by the engine.
///
/// Tasks start out `Unclassified` and stay there until clustering has run
/// over a population of at least two tasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
    Unclassified,
}

impl Priority {
    /// Display/sort rank: High=0, Medium=1, Low=2, Unclassified=3.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Unclassified => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unclassified => "Unclassified",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Unclassified
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A short-lived work item tracked by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned at creation, never reused
    pub id: String,
    /// Free-text description
    pub description: String,
    /// User-supplied urgency score, 1-10
    pub urgency: i32,
    /// User-supplied importance score, 1-10
    pub importance: i32,
    /// Due date
    pub due_date: NaiveDate,
    /// Whole days between the reference date and the due date, floored at 0
    pub days_left: i64,
    /// Time-pressure factor derived from days_left; 1 when far out, rises
    /// toward 10 as the due date nears
    pub time_factor: f64,
    /// Cluster assignment from the most recent recompute
    pub cluster: Option<usize>,
    /// Priority tier from the most recent recompute
    pub priority: Priority,
}

impl Task {
    /// Create a task with derived fields computed against `reference`.
    ///
    /// Caller is responsible for validating urgency/importance range and the
    /// due date format; the store's add operation is that boundary.
    pub fn new(
        description: impl Into<String>,
        urgency: i32,
        importance: i32,
        due_date: NaiveDate,
        reference: NaiveDate,
    ) -> Self {
        let days_left = days_left(due_date, reference);
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            description: description.into(),
            urgency,
            importance,
            due_date,
            days_left,
            time_factor: time_factor(days_left),
            cluster: None,
            priority: Priority::Unclassified,
        }
    }

    /// Re-derive days_left and time_factor against a new reference date.
    pub(crate) fn rederive(&mut self, reference: NaiveDate) {
        self.days_left = days_left(self.due_date, reference);
        self.time_factor = time_factor(self.days_left);
    }
}

/// Whole days until the due date, floored at 0 for overdue tasks.
pub fn days_left(due_date: NaiveDate, reference: NaiveDate) -> i64 {
    (due_date - reference).num_days().max(0)
}

/// Time-pressure factor: `max(10 - days_left / 3, 1)`.
///
/// Monotonically non-increasing in days_left; clamps at 1 once the due date
/// is 27 or more days out.
pub fn time_factor(days_left: i64) -> f64 {
    (10.0 - days_left as f64 / 3.0).max(1.0)
}
