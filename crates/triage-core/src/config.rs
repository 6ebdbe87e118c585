//! Engine configuration.
//!
//! The reference date is explicit configuration, never read from ambient
//! state inside the engine, so the pipeline stays testable with arbitrary
//! dates.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// When days_left and time_factor are derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueDatePolicy {
    /// Freeze both fields when the task is created (default)
    SnapshotAtCreation,
    /// Re-derive both fields against the configured reference date at the
    /// start of every recompute, so pressure rises as a due date approaches
    RecomputeOnRead,
}

impl Default for DueDatePolicy {
    fn default() -> Self {
        DueDatePolicy::SnapshotAtCreation
    }
}

/// Process-wide engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The "today" used for all days-until-due derivations
    #[serde(default = "today")]
    pub reference_date: NaiveDate,
    /// Seed for the clustering initialization
    #[serde(default)]
    pub seed: u64,
    /// Snapshot vs recompute-on-read derivation of time pressure
    #[serde(default)]
    pub due_date_policy: DueDatePolicy,
}

impl EngineConfig {
    /// Configuration anchored at an explicit reference date.
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            seed: 0,
            due_date_policy: DueDatePolicy::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_due_date_policy(mut self, policy: DueDatePolicy) -> Self {
        self.due_date_policy = policy;
        self
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(today())
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
