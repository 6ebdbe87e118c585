//! # Triage Core Library
//!
//! This library provides the core logic for Triage, a tracker for
//! short-lived work items that ranks them into High/Medium/Low priority
//! tiers. User-supplied urgency and importance scores are combined with a
//! derived time-pressure factor, tasks with similar profiles are grouped by
//! seeded k-means, and the groups are ranked into ordinal tiers.
//!
//! Rendering surfaces (tables, charts, HTTP) are external consumers of the
//! engine's output and live outside this crate.
//!
//! ## Key Components
//!
//! - [`PrioritizationEngine`]: recompute-on-read orchestrator over the store
//! - [`TaskStore`]: validated, insertion-ordered in-memory task storage
//! - [`Clusterer`] / [`KMeans`]: deterministic centroid clustering
//! - [`EngineConfig`]: reference date, seed and due-date policy

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod store;
pub mod task;
pub mod tier;

pub use cluster::{Clusterer, KMeans};
pub use config::{DueDatePolicy, EngineConfig};
pub use engine::{PrioritizationEngine, PrioritizedView};
pub use error::{ConfigError, EngineError, Result};
pub use features::FeatureVector;
pub use store::TaskStore;
pub use task::{Priority, Task};
pub use tier::ClusterSummary;
