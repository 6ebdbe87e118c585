//! Feature derivation and batch normalization.
//!
//! Each task is represented for clustering by a (urgency, importance,
//! time_factor) triple. Normalization is batch-relative: every dimension is
//! rescaled to zero mean / unit variance across the current task set, so a
//! given raw score means more or less depending on the rest of the workload.

use crate::task::Task;

/// Number of feature dimensions per task.
pub const FEATURE_DIMS: usize = 3;

/// Raw feature triple for one task.
///
/// Ephemeral: rebuilt from the task's frozen fields on every recompute and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub urgency: f64,
    pub importance: f64,
    pub time_factor: f64,
}

impl FeatureVector {
    /// Derive the feature triple from a task. Pure and deterministic.
    pub fn from_task(task: &Task) -> Self {
        Self {
            urgency: task.urgency as f64,
            importance: task.importance as f64,
            time_factor: task.time_factor,
        }
    }

    pub fn to_array(self) -> [f64; FEATURE_DIMS] {
        [self.urgency, self.importance, self.time_factor]
    }
}

/// Rescale a batch of feature vectors to zero mean / unit variance per
/// dimension.
///
/// Uses the population standard deviation. A dimension with zero variance
/// maps to 0 for every task rather than dividing by zero.
pub fn normalize(batch: &[FeatureVector]) -> Vec<[f64; FEATURE_DIMS]> {
    let n = batch.len();
    if n == 0 {
        return Vec::new();
    }

    let rows: Vec<[f64; FEATURE_DIMS]> = batch.iter().map(|v| v.to_array()).collect();

    let mut means = [0.0; FEATURE_DIMS];
    for row in &rows {
        for (m, x) in means.iter_mut().zip(row) {
            *m += x;
        }
    }
    for m in &mut means {
        *m /= n as f64;
    }

    let mut stds = [0.0; FEATURE_DIMS];
    for row in &rows {
        for d in 0..FEATURE_DIMS {
            let diff = row[d] - means[d];
            stds[d] += diff * diff;
        }
    }
    for s in &mut stds {
        *s = (*s / n as f64).sqrt();
    }

    rows.iter()
        .map(|row| {
            let mut scaled = [0.0; FEATURE_DIMS];
            for d in 0..FEATURE_DIMS {
                scaled[d] = if stds[d] > 0.0 {
                    (row[d] - means[d]) / stds[d]
                } else {
                    0.0
                };
            }
            scaled
        })
        .collect()
}
