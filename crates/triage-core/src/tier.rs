//! Cluster ranking and tier labels.
//!
//! Clustering hands back unordered group ids; this module turns them into a
//! human-meaningful ranking. Each cluster is scored by the sum of its mean
//! raw urgency, importance and time_factor (raw, not normalized: the ranking
//! reflects real-world magnitude, not relative shape), then labeled High
//! down to Low by descending score.

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};

/// Per-cluster aggregate produced on every recompute.
///
/// `points` carries the members' raw (urgency, importance) pairs so a
/// visualization layer can scatter-plot clusters without another pass over
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Cluster id as assigned by the clusterer
    pub cluster: usize,
    /// Number of member tasks
    pub member_count: usize,
    /// Mean raw urgency over members
    pub mean_urgency: f64,
    /// Mean raw importance over members
    pub mean_importance: f64,
    /// Mean time_factor over members
    pub mean_time_factor: f64,
    /// Composite score: mean_urgency + mean_importance + mean_time_factor
    pub score: f64,
    /// Tier label assigned from the cluster's rank
    pub label: Priority,
    /// Raw (urgency, importance) of each member, in store order
    pub points: Vec<(i32, i32)>,
}

/// Score, rank and label every cluster.
///
/// `assignments[i]` is the cluster id of `tasks[i]`; ids must cover
/// `[0, max_id]` with no empty cluster. Summaries come back in rank order
/// (highest composite score first); ties break by ascending cluster id.
///
/// With a single cluster no relative ranking exists, so it gets the neutral
/// `Medium` rather than an extreme. Two clusters get High/Low; three get
/// High/Medium/Low.
pub fn rank_clusters(tasks: &[Task], assignments: &[usize]) -> Vec<ClusterSummary> {
    debug_assert_eq!(tasks.len(), assignments.len());
    let Some(&max_id) = assignments.iter().max() else {
        return Vec::new();
    };
    let k = max_id + 1;

    let mut summaries: Vec<ClusterSummary> = (0..k)
        .map(|cluster| {
            let members: Vec<&Task> = tasks
                .iter()
                .zip(assignments)
                .filter(|(_, &a)| a == cluster)
                .map(|(t, _)| t)
                .collect();
            let count = members.len();
            let mean = |f: &dyn Fn(&Task) -> f64| -> f64 {
                members.iter().map(|&t| f(t)).sum::<f64>() / count as f64
            };
            let mean_urgency = mean(&|t| t.urgency as f64);
            let mean_importance = mean(&|t| t.importance as f64);
            let mean_time_factor = mean(&|t| t.time_factor);

            ClusterSummary {
                cluster,
                member_count: count,
                mean_urgency,
                mean_importance,
                mean_time_factor,
                score: mean_urgency + mean_importance + mean_time_factor,
                label: Priority::Unclassified,
                points: members.iter().map(|t| (t.urgency, t.importance)).collect(),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.cluster.cmp(&b.cluster))
    });

    if k == 1 {
        summaries[0].label = Priority::Medium;
    } else {
        let labels = match k {
            2 => [Priority::High, Priority::Low].as_slice(),
            _ => [Priority::High, Priority::Medium, Priority::Low].as_slice(),
        };
        for (summary, &label) in summaries.iter_mut().zip(labels) {
            summary.label = label;
        }
    }

    summaries
}
