//! Centroid-based clustering over normalized feature vectors.
//!
//! The engine only depends on the [`Clusterer`] trait: a black-box that
//! partitions vectors into non-empty groups, deterministically for a fixed
//! seed. The default backing implementation is an in-crate k-means with
//! seeded k-means++ initialization, so identical inputs always produce
//! identical assignments across runs.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use crate::features::FEATURE_DIMS;

/// Partitioning capability used by the engine.
///
/// Contract: returned cluster ids lie in `[0, g)` for some `g <= k`, every
/// id in that range has at least one member, and the same vectors with the
/// same seed always yield the same assignments. `g` may fall below `k` only
/// when the input has fewer than `k` distinct vectors.
pub trait Clusterer {
    fn cluster(&self, vectors: &[[f64; FEATURE_DIMS]], k: usize) -> Vec<usize>;
}

/// Deterministic k-means (Lloyd's algorithm, k-means++ init).
#[derive(Debug, Clone)]
pub struct KMeans {
    seed: u64,
    max_iterations: usize,
}

impl KMeans {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_iterations: 100,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clusterer for KMeans {
    fn cluster(&self, vectors: &[[f64; FEATURE_DIMS]], k: usize) -> Vec<usize> {
        let n = vectors.len();
        if n == 0 || k == 0 {
            return Vec::new();
        }

        // Duplicate vectors must share a cluster, so the group count is
        // capped by the number of distinct inputs.
        let k = k.min(distinct_count(vectors));
        if k <= 1 {
            return vec![0; n];
        }

        let mut rng = Mcg128Xsl64::seed_from_u64(self.seed);
        let mut centroids = init_centroids(vectors, k, &mut rng);
        let mut assignments = vec![0usize; n];

        for _ in 0..self.max_iterations {
            let next = assign(vectors, &centroids);
            let next = repair_empty(vectors, &centroids, next, k);
            let converged = next == assignments;
            assignments = next;
            centroids = recompute_centroids(vectors, &assignments, k);
            if converged {
                break;
            }
        }

        assignments
    }
}

fn squared_distance(a: &[f64; FEATURE_DIMS], b: &[f64; FEATURE_DIMS]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn distinct_count(vectors: &[[f64; FEATURE_DIMS]]) -> usize {
    let mut seen: Vec<&[f64; FEATURE_DIMS]> = Vec::new();
    for v in vectors {
        if !seen.iter().any(|s| *s == v) {
            seen.push(v);
        }
    }
    seen.len()
}

/// k-means++ seeding: first centroid uniform, the rest sampled with
/// probability proportional to squared distance from the nearest chosen
/// centroid. All randomness comes from the caller's seeded generator.
fn init_centroids(
    vectors: &[[f64; FEATURE_DIMS]],
    k: usize,
    rng: &mut Mcg128Xsl64,
) -> Vec<[f64; FEATURE_DIMS]> {
    let n = vectors.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(vectors[rng.gen_range(0..n)]);

    while centroids.len() < k {
        let weights: Vec<f64> = vectors
            .iter()
            .map(|v| {
                centroids
                    .iter()
                    .map(|c| squared_distance(v, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let picked = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut picked = None;
            for (i, w) in weights.iter().enumerate() {
                if *w <= 0.0 {
                    continue;
                }
                target -= w;
                if target <= 0.0 {
                    picked = Some(i);
                    break;
                }
            }
            // Rounding can leave a sliver of target; fall back to the last
            // point with positive weight.
            picked.unwrap_or_else(|| {
                weights
                    .iter()
                    .rposition(|w| *w > 0.0)
                    .unwrap_or(0)
            })
        } else {
            0
        };
        centroids.push(vectors[picked]);
    }

    centroids
}

/// Assign each vector to its nearest centroid, ties to the lowest id.
fn assign(vectors: &[[f64; FEATURE_DIMS]], centroids: &[[f64; FEATURE_DIMS]]) -> Vec<usize> {
    vectors
        .iter()
        .map(|v| {
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = squared_distance(v, centroid);
                if d < best_dist {
                    best = c;
                    best_dist = d;
                }
            }
            best
        })
        .collect()
}

/// Give every empty cluster one member by stealing the point farthest from
/// its current centroid, taken only from clusters that keep at least one
/// member. Deterministic: scans in index order, strict improvement only.
fn repair_empty(
    vectors: &[[f64; FEATURE_DIMS]],
    centroids: &[[f64; FEATURE_DIMS]],
    mut assignments: Vec<usize>,
    k: usize,
) -> Vec<usize> {
    loop {
        let mut counts = vec![0usize; k];
        for &a in &assignments {
            counts[a] += 1;
        }
        let Some(empty) = counts.iter().position(|&c| c == 0) else {
            return assignments;
        };

        let mut donor: Option<usize> = None;
        let mut donor_dist = -1.0;
        for (i, &a) in assignments.iter().enumerate() {
            if counts[a] <= 1 {
                continue;
            }
            let d = squared_distance(&vectors[i], &centroids[a]);
            if d > donor_dist {
                donor = Some(i);
                donor_dist = d;
            }
        }

        match donor {
            Some(i) => assignments[i] = empty,
            // No cluster can spare a member; only possible when n < k,
            // which the caller rules out.
            None => return assignments,
        }
    }
}

fn recompute_centroids(
    vectors: &[[f64; FEATURE_DIMS]],
    assignments: &[usize],
    k: usize,
) -> Vec<[f64; FEATURE_DIMS]> {
    let mut sums = vec![[0.0; FEATURE_DIMS]; k];
    let mut counts = vec![0usize; k];
    for (v, &a) in vectors.iter().zip(assignments) {
        for d in 0..FEATURE_DIMS {
            sums[a][d] += v[d];
        }
        counts[a] += 1;
    }
    for (sum, &count) in sums.iter_mut().zip(&counts) {
        if count > 0 {
            for d in sum.iter_mut() {
                *d /= count as f64;
            }
        }
    }
    sums
}
