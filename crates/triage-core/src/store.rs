//! In-memory task storage.
//!
//! The store owns every task instance and keeps them in insertion order.
//! Store order is clustering input order only; it is not priority order.

use chrono::NaiveDate;

use crate::error::{EngineError, Result};
use crate::task::Task;

const SCORE_MIN: i32 = 1;
const SCORE_MAX: i32 = 10;

/// Insertion-ordered collection of tasks.
///
/// All validation happens in [`TaskStore::add`]; tasks already in the store
/// are trusted to satisfy their invariants.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Validate inputs, create a task against `reference`, and append it.
    ///
    /// Returns a clone of the stored task. Fails with
    /// [`EngineError::InvalidRange`] when urgency or importance is outside
    /// 1-10, and [`EngineError::InvalidDate`] when the due date is not a
    /// valid `YYYY-MM-DD` calendar date.
    pub fn add(
        &mut self,
        description: &str,
        urgency: i32,
        importance: i32,
        due_date: &str,
        reference: NaiveDate,
    ) -> Result<Task> {
        let description = description.trim();
        if description.is_empty() {
            return Err(EngineError::EmptyDescription);
        }
        check_score("urgency", urgency)?;
        check_score("importance", importance)?;
        let due = NaiveDate::parse_from_str(due_date, "%Y-%m-%d").map_err(|source| {
            EngineError::InvalidDate {
                input: due_date.to_string(),
                source,
            }
        })?;

        let task = Task::new(description, urgency, importance, due, reference);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Remove the task with the given id.
    ///
    /// Deletion is idempotent: removing an id that is not present is a
    /// no-op, reported through the bool return rather than an error.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn check_score(field: &'static str, value: i32) -> Result<()> {
    if (SCORE_MIN..=SCORE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidRange {
            field,
            value: value as i64,
        })
    }
}
