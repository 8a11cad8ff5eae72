//! Seeded K-means: k-means++ initialisation, Lloyd iterations and
//! several restarts, keeping the run with the lowest inertia.

use crate::config::KMeansParams;
use crate::error::ClusterError;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

/// Outcome of a k-means fit
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster index per input row
    pub labels: Vec<usize>,
    /// Final centroids, one row per cluster
    pub centroids: Array2<f64>,
    /// Sum of squared distances of rows to their centroid
    pub inertia: f64,
    /// Lloyd iterations used by the retained run
    pub n_iter: usize,
}

impl KMeansFit {
    pub fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Squared Euclidean distance
#[inline]
fn dist_sq(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index and squared distance of the closest centroid; lowest index on ties.
fn nearest(point: &ArrayView1<f64>, centroids: &Array2<f64>) -> (usize, f64) {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (ci, centroid) in centroids.outer_iter().enumerate() {
        let dist = dist_sq(point, &centroid);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = ci;
        }
    }
    (best_cluster, best_dist)
}

/// k-means++: first centroid uniform, the rest drawn proportional to the
/// squared distance to the nearest centroid chosen so far.
fn kmeans_pp_init(x: &ArrayView2<f64>, k: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
    let n = x.nrows();
    let mut centroids = Array2::zeros((k, x.ncols()));
    centroids.row_mut(0).assign(&x.row(rng.gen_range(0..n)));

    let mut closest: Vec<f64> = x
        .outer_iter()
        .map(|row| dist_sq(&row, &centroids.row(0)))
        .collect();

    for c in 1..k {
        let total: f64 = closest.iter().sum();
        let chosen = if total > 0.0 {
            let r = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            closest
                .iter()
                .position(|&d| {
                    cumulative += d;
                    cumulative > r
                })
                .or_else(|| closest.iter().rposition(|&d| d > 0.0))
                .unwrap_or(0)
        } else {
            // every row sits on a centroid already
            rng.gen_range(0..n)
        };
        centroids.row_mut(c).assign(&x.row(chosen));

        for (d, row) in closest.iter_mut().zip(x.outer_iter()) {
            *d = d.min(dist_sq(&row, &centroids.row(c)));
        }
    }

    centroids
}

/// Lloyd iterations from the given centroids.
fn lloyd(x: &ArrayView2<f64>, mut centroids: Array2<f64>, max_iter: usize, tol: f64) -> KMeansFit {
    let nrows = x.nrows();
    let k = centroids.nrows();
    let mut labels = vec![usize::MAX; nrows];
    let mut n_iter = 0;

    for iter in 0..max_iter {
        n_iter = iter + 1;

        // Step 1: assign points to nearest centroid
        let mut changed = false;
        for (i, row) in x.outer_iter().enumerate() {
            let (cluster, _) = nearest(&row, &centroids);
            if labels[i] != cluster {
                labels[i] = cluster;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        // Step 2: update centroids as mean of assigned points
        let mut new_centroids = Array2::<f64>::zeros(centroids.dim());
        let mut counts = vec![0usize; k];
        for (i, row) in x.outer_iter().enumerate() {
            let mut target = new_centroids.row_mut(labels[i]);
            target += &row;
            counts[labels[i]] += 1;
        }
        for (ci, &count) in counts.iter().enumerate() {
            if count > 0 {
                new_centroids
                    .row_mut(ci)
                    .mapv_inplace(|v| v / count as f64);
            }
        }

        // Empty clusters move to the points worst served by their centroid
        let mut relocated: Vec<usize> = Vec::new();
        for ci in (0..k).filter(|&ci| counts[ci] == 0) {
            let far = x
                .outer_iter()
                .enumerate()
                .filter(|(i, _)| !relocated.contains(i))
                .map(|(i, row)| (i, dist_sq(&row, &new_centroids.row(labels[i]))))
                .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                    Some((_, bd)) if bd >= d => best,
                    _ => Some((i, d)),
                });
            if let Some((idx, _)) = far {
                new_centroids.row_mut(ci).assign(&x.row(idx));
                relocated.push(idx);
            }
        }

        let shift: f64 = (&centroids - &new_centroids).mapv(|v| v * v).sum();
        centroids = new_centroids;
        if shift <= tol {
            break;
        }
    }

    // Final assignment against the last centroids
    let mut inertia = 0.0;
    for (i, row) in x.outer_iter().enumerate() {
        let (cluster, dist) = nearest(&row, &centroids);
        labels[i] = cluster;
        inertia += dist;
    }

    KMeansFit {
        labels,
        centroids,
        inertia,
        n_iter,
    }
}

/// Cluster the rows of `x`.
///
/// When `x` has fewer rows than `params.n_clusters`, the number of clusters
/// is reduced to the row count. The result depends only on `x` and
/// `params`; the same seed always gives the same labels.
pub fn fit(x: ArrayView2<f64>, params: &KMeansParams) -> Result<KMeansFit, ClusterError> {
    let nrows = x.nrows();
    if nrows == 0 {
        return Err(ClusterError::EmptyInput);
    }
    if params.n_clusters == 0 {
        return Err(ClusterError::InvalidParams("n_clusters must be at least 1".into()));
    }
    if params.n_init == 0 {
        return Err(ClusterError::InvalidParams("n_init must be at least 1".into()));
    }

    let k = params.n_clusters.min(nrows);
    if k < params.n_clusters {
        warn!(
            "only {} rows for {} clusters, fitting {} clusters",
            nrows, params.n_clusters, k
        );
    }

    let mean_variance = x.var_axis(Axis(0), 0.0).mean().unwrap_or(0.0);
    let tol = params.tolerance * mean_variance;

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let mut best: Option<KMeansFit> = None;

    for run in 0..params.n_init {
        let init = kmeans_pp_init(&x, k, &mut rng);
        let result = lloyd(&x, init, params.max_iter, tol);
        debug!(
            "k-means run {}: inertia {:.4} after {} iterations",
            run, result.inertia, result.n_iter
        );
        if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
            best = Some(result);
        }
    }

    best.ok_or(ClusterError::EmptyInput)
}
