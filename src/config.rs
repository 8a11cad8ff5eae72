//! Pipeline configuration and its defaults.

use std::path::{Path, PathBuf};

/// Data file the dashboard reads when no path is given.
pub const DEFAULT_DATA_PATH: &str = "Sociolla_cluster(new).csv";

/// Number of product segments. Fixed, not exposed on the command line.
pub const N_CLUSTERS: usize = 4;
/// Independent k-means++ restarts; the lowest-inertia run is kept.
pub const N_INIT: usize = 10;
pub const MAX_ITER: usize = 300;
/// Relative tolerance, scaled by the mean feature variance.
pub const TOLERANCE: f64 = 1e-4;
pub const RANDOM_SEED: u64 = 42;

/// Parameters for the clustering step
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansParams {
    pub n_clusters: usize,
    pub n_init: usize,
    pub max_iter: usize,
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            n_clusters: N_CLUSTERS,
            n_init: N_INIT,
            max_iter: MAX_ITER,
            tolerance: TOLERANCE,
            seed: RANDOM_SEED,
        }
    }
}

impl KMeansParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Everything the pipeline driver needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub kmeans: KMeansParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}

impl PipelineConfig {
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            kmeans: KMeansParams::default(),
        }
    }
}
