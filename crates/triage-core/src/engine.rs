//! Prioritization engine.
//!
//! Wires the store, feature pipeline, clusterer and tier ranker into a
//! single recompute-on-read operation. Every read rebuilds features from
//! scratch, re-normalizes against the current population, re-clusters and
//! re-labels; nothing is cached between reads and nothing runs in the
//! background.
//!
//! All store access goes through one mutex so a recompute never interleaves
//! with an add, a delete or another recompute. Clustering is batch-relative;
//! a task added mid-recompute would otherwise be scored against a stale
//! population. Everything inside the critical section is bounded by the task
//! count and k <= 3, so the engine stays synchronous and blocking.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;

use crate::cluster::{Clusterer, KMeans};
use crate::config::{DueDatePolicy, EngineConfig};
use crate::error::Result;
use crate::features::{normalize, FeatureVector};
use crate::store::TaskStore;
use crate::task::{Priority, Task};
use crate::tier::{rank_clusters, ClusterSummary};

/// Maximum number of priority tiers, and therefore clusters.
const MAX_CLUSTERS: usize = 3;

/// Annotated, ordered output of one recompute.
#[derive(Debug, Clone, Serialize)]
pub struct PrioritizedView {
    /// Tasks ordered by tier (High, Medium, Low, Unclassified), stable with
    /// respect to store order within a tier
    pub tasks: Vec<Task>,
    /// Per-cluster summaries in rank order; empty when clustering was
    /// skipped
    pub clusters: Vec<ClusterSummary>,
}

/// The task prioritization engine.
///
/// Owns the task store behind a mutex and recomputes priorities on every
/// read. With fewer than two tasks clustering is skipped and every task is
/// reported `Unclassified`.
pub struct PrioritizationEngine {
    config: EngineConfig,
    clusterer: Box<dyn Clusterer + Send + Sync>,
    store: Mutex<TaskStore>,
}

impl PrioritizationEngine {
    /// Engine with the default seeded k-means clusterer.
    pub fn new(config: EngineConfig) -> Self {
        let clusterer = Box::new(KMeans::new(config.seed));
        Self::with_clusterer(config, clusterer)
    }

    /// Engine with a caller-supplied clusterer. The clusterer must honor the
    /// [`Clusterer`] determinism contract or the engine's own determinism
    /// guarantee is lost.
    pub fn with_clusterer(config: EngineConfig, clusterer: Box<dyn Clusterer + Send + Sync>) -> Self {
        Self {
            config,
            clusterer,
            store: Mutex::new(TaskStore::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Move the process-wide reference date, e.g. across a midnight
    /// boundary. Only meaningful together with
    /// [`DueDatePolicy::RecomputeOnRead`]; under the snapshot policy
    /// existing tasks keep their frozen derivations.
    pub fn set_reference_date(&mut self, reference_date: NaiveDate) {
        self.config.reference_date = reference_date;
    }

    /// Validate and add a task. See [`TaskStore::add`] for the error cases.
    pub fn add_task(
        &self,
        description: &str,
        urgency: i32,
        importance: i32,
        due_date: &str,
    ) -> Result<Task> {
        self.lock()
            .add(description, urgency, importance, due_date, self.config.reference_date)
    }

    /// Delete a task by id. Idempotent; unknown ids are ignored.
    pub fn delete_task(&self, id: &str) {
        self.lock().remove(id);
    }

    pub fn task_count(&self) -> usize {
        self.lock().len()
    }

    /// Recompute and return the full annotated view: tasks in tier order
    /// plus per-cluster summaries.
    pub fn prioritized(&self) -> PrioritizedView {
        let mut store = self.lock();
        let clusters = self.recompute(&mut store);

        let mut tasks = store.tasks().to_vec();
        // Stable sort keeps store order within equal tiers.
        tasks.sort_by_key(|t| t.priority.rank());

        PrioritizedView { tasks, clusters }
    }

    /// Tasks in tier order.
    pub fn prioritized_view(&self) -> Vec<Task> {
        self.prioritized().tasks
    }

    /// Cluster summaries for the visualization collaborator.
    pub fn cluster_summaries(&self) -> Vec<ClusterSummary> {
        self.prioritized().clusters
    }

    /// The recompute pipeline: features -> normalize -> cluster -> rank ->
    /// write back. Runs under the store lock.
    fn recompute(&self, store: &mut TaskStore) -> Vec<ClusterSummary> {
        if self.config.due_date_policy == DueDatePolicy::RecomputeOnRead {
            for task in store.tasks_mut() {
                task.rederive(self.config.reference_date);
            }
        }

        let n = store.len();
        if n < 2 {
            for task in store.tasks_mut() {
                task.priority = Priority::Unclassified;
            }
            return Vec::new();
        }

        let features: Vec<FeatureVector> =
            store.tasks().iter().map(FeatureVector::from_task).collect();
        let scaled = normalize(&features);
        let assignments = self.clusterer.cluster(&scaled, MAX_CLUSTERS.min(n));

        let summaries = rank_clusters(store.tasks(), &assignments);
        let mut label_of = vec![Priority::Unclassified; MAX_CLUSTERS];
        for summary in &summaries {
            label_of[summary.cluster] = summary.label;
        }
        for (task, &cluster) in store.tasks_mut().iter_mut().zip(&assignments) {
            task.cluster = Some(cluster);
            task.priority = label_of[cluster];
        }

        summaries
    }

    fn lock(&self) -> MutexGuard<'_, TaskStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use proptest::prelude::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 24).unwrap()
    }

    fn engine() -> PrioritizationEngine {
        PrioritizationEngine::new(EngineConfig::new(reference()))
    }

    fn due_in(days: i64) -> String {
        (reference() + chrono::Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    #[test]
    fn test_empty_store_view() {
        let engine = engine();
        let view = engine.prioritized();
        assert!(view.tasks.is_empty());
        assert!(view.clusters.is_empty());
    }

    #[test]
    fn test_single_task_stays_unclassified() {
        let engine = engine();
        engine.add_task("only one", 9, 9, &due_in(1)).unwrap();

        let view = engine.prioritized();
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.tasks[0].priority, Priority::Unclassified);
        assert!(view.clusters.is_empty());
    }

    #[test]
    fn test_three_spread_tasks_get_three_tiers() {
        // urgent+important due tomorrow, trivial far out, middling between
        let engine = engine();
        let t1 = engine.add_task("fire", 9, 9, &due_in(1)).unwrap();
        let t2 = engine.add_task("someday", 2, 2, &due_in(30)).unwrap();
        let t3 = engine.add_task("normal", 5, 5, &due_in(10)).unwrap();

        let view = engine.prioritized();
        assert_eq!(view.clusters.len(), 3);
        assert_eq!(view.clusters[0].label, Priority::High);
        assert_eq!(view.clusters[1].label, Priority::Medium);
        assert_eq!(view.clusters[2].label, Priority::Low);
        assert!(view.clusters[0].score > view.clusters[1].score);
        assert!(view.clusters[1].score > view.clusters[2].score);

        let label_of = |id: &str| {
            view.tasks
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.priority)
                .unwrap()
        };
        assert_eq!(label_of(&t1.id), Priority::High);
        assert_eq!(label_of(&t3.id), Priority::Medium);
        assert_eq!(label_of(&t2.id), Priority::Low);

        // view comes back in tier order
        assert_eq!(view.tasks[0].id, t1.id);
        assert_eq!(view.tasks[1].id, t3.id);
        assert_eq!(view.tasks[2].id, t2.id);
    }

    #[test]
    fn test_identical_tasks_share_cluster_and_label() {
        let engine = engine();
        engine.add_task("twin a", 6, 6, &due_in(5)).unwrap();
        engine.add_task("twin b", 6, 6, &due_in(5)).unwrap();

        let view = engine.prioritized();
        assert_eq!(view.tasks[0].cluster, view.tasks[1].cluster);
        assert_eq!(view.tasks[0].priority, view.tasks[1].priority);
        // one cluster means no relative ranking, so the neutral tier
        assert_eq!(view.tasks[0].priority, Priority::Medium);
        assert_eq!(view.clusters.len(), 1);
        assert_eq!(view.clusters[0].member_count, 2);
    }

    #[test]
    fn test_two_distinct_tasks_get_high_and_low() {
        let engine = engine();
        let hot = engine.add_task("hot", 9, 9, &due_in(1)).unwrap();
        let cold = engine.add_task("cold", 2, 2, &due_in(30)).unwrap();

        let view = engine.prioritized();
        assert_eq!(view.tasks[0].id, hot.id);
        assert_eq!(view.tasks[0].priority, Priority::High);
        assert_eq!(view.tasks[1].id, cold.id);
        assert_eq!(view.tasks[1].priority, Priority::Low);
    }

    #[test]
    fn test_delete_below_two_reverts_to_unclassified() {
        let engine = engine();
        let keep = engine.add_task("keep", 9, 9, &due_in(1)).unwrap();
        let drop = engine.add_task("drop", 2, 2, &due_in(30)).unwrap();

        let view = engine.prioritized();
        assert!(view.tasks.iter().all(|t| t.priority != Priority::Unclassified));

        engine.delete_task(&drop.id);
        let view = engine.prioritized();
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.tasks[0].id, keep.id);
        assert_eq!(view.tasks[0].priority, Priority::Unclassified);
        assert!(view.clusters.is_empty());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let engine = engine();
        engine.add_task("a", 5, 5, &due_in(3)).unwrap();
        engine.delete_task("no-such-id");
        assert_eq!(engine.task_count(), 1);
    }

    #[test]
    fn test_add_validation_errors() {
        let engine = engine();
        assert!(matches!(
            engine.add_task("too urgent", 11, 5, &due_in(3)),
            Err(EngineError::InvalidRange { field: "urgency", value: 11 })
        ));
        assert!(matches!(
            engine.add_task("bad date", 5, 5, "2025-13-40"),
            Err(EngineError::InvalidDate { .. })
        ));
        assert_eq!(engine.task_count(), 0);
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let engine = engine();
        engine.add_task("a", 9, 8, &due_in(1)).unwrap();
        engine.add_task("b", 3, 2, &due_in(20)).unwrap();
        engine.add_task("c", 5, 6, &due_in(8)).unwrap();
        engine.add_task("d", 7, 7, &due_in(2)).unwrap();

        let first = engine.prioritized();
        for _ in 0..5 {
            let again = engine.prioritized();
            let fingerprint = |v: &PrioritizedView| -> Vec<(String, Option<usize>, u8)> {
                v.tasks
                    .iter()
                    .map(|t| (t.id.clone(), t.cluster, t.priority.rank()))
                    .collect()
            };
            assert_eq!(fingerprint(&again), fingerprint(&first));
        }
    }

    #[test]
    fn test_view_order_is_stable_within_tier() {
        let engine = engine();
        // four near-identical hot tasks and two cold ones; the hot tasks
        // should appear in insertion order within their tier
        let a = engine.add_task("hot 1", 9, 9, &due_in(1)).unwrap();
        let b = engine.add_task("hot 2", 9, 9, &due_in(1)).unwrap();
        engine.add_task("cold 1", 1, 1, &due_in(40)).unwrap();
        let c = engine.add_task("hot 3", 9, 9, &due_in(1)).unwrap();
        engine.add_task("cold 2", 1, 1, &due_in(40)).unwrap();

        let view = engine.prioritized();
        let hot_ids: Vec<&str> = view
            .tasks
            .iter()
            .filter(|t| t.priority == view.tasks[0].priority)
            .map(|t| t.id.as_str())
            .collect();
        let expected: Vec<&str> = vec![&a.id, &b.id, &c.id];
        assert_eq!(hot_ids, expected);
    }

    #[test]
    fn test_snapshot_policy_freezes_derivations() {
        let mut engine = engine();
        let task = engine.add_task("frozen", 5, 5, &due_in(9)).unwrap();
        assert_eq!(task.days_left, 9);

        engine.set_reference_date(reference() + chrono::Duration::days(7));
        let view = engine.prioritized();
        assert_eq!(view.tasks[0].days_left, 9);
    }

    #[test]
    fn test_recompute_on_read_policy_tracks_reference_date() {
        let config = EngineConfig::new(reference())
            .with_due_date_policy(DueDatePolicy::RecomputeOnRead);
        let mut engine = PrioritizationEngine::new(config);
        let task = engine.add_task("live", 5, 5, &due_in(9)).unwrap();
        let factor_at_add = task.time_factor;

        engine.set_reference_date(reference() + chrono::Duration::days(7));
        let view = engine.prioritized();
        assert_eq!(view.tasks[0].days_left, 2);
        assert!(view.tasks[0].time_factor > factor_at_add);
    }

    proptest! {
        #[test]
        fn prop_recompute_deterministic_and_invariants_hold(
            specs in prop::collection::vec(
                (1..=10i32, 1..=10i32, 0..60i64),
                1..12,
            )
        ) {
            let engine = engine();
            for (i, (urgency, importance, days)) in specs.iter().enumerate() {
                engine
                    .add_task(&format!("task {i}"), *urgency, *importance, &due_in(*days))
                    .unwrap();
            }

            let first = engine.prioritized();
            let second = engine.prioritized();

            let fingerprint = |v: &PrioritizedView| -> Vec<(String, Option<usize>, u8)> {
                v.tasks
                    .iter()
                    .map(|t| (t.id.clone(), t.cluster, t.priority.rank()))
                    .collect()
            };
            prop_assert_eq!(fingerprint(&first), fingerprint(&second));

            // field invariants survive recompute
            for task in &first.tasks {
                prop_assert!((1..=10).contains(&task.urgency));
                prop_assert!((1..=10).contains(&task.importance));
                prop_assert!(task.days_left >= 0);
                prop_assert!(task.time_factor >= 1.0);
            }

            // tier order is monotone in the view
            let ranks: Vec<u8> = first.tasks.iter().map(|t| t.priority.rank()).collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));

            if specs.len() < 2 {
                prop_assert!(first
                    .tasks
                    .iter()
                    .all(|t| t.priority == Priority::Unclassified));
                prop_assert!(first.clusters.is_empty());
            } else {
                // every reported cluster is non-empty and every task is
                // labeled from its cluster
                prop_assert!(!first.clusters.is_empty());
                for summary in &first.clusters {
                    prop_assert!(summary.cluster < 3);
                    prop_assert!(summary.member_count > 0);
                }
                for task in &first.tasks {
                    let cluster = task.cluster.unwrap();
                    let summary = first
                        .clusters
                        .iter()
                        .find(|s| s.cluster == cluster)
                        .unwrap();
                    prop_assert_eq!(task.priority, summary.label);
                }
            }
        }
    }
}
