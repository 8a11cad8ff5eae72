//! Segmenting products on price, rating and review count.

use crate::config::KMeansParams;
use crate::error::ClusterError;
use crate::kmeans::{self, KMeansFit};
use crate::resolve::Field;
use crate::scaler::StandardScaler;
use crate::working::{ClusterLabel, WorkingTable};
use ndarray::Array2;
use tracing::info;

/// Standard fields the clustering runs on, in feature-column order.
pub const FEATURES: [Field; 3] = [Field::Price, Field::Rating, Field::Reviews];

/// How the `cluster` column of a [`ClusteredTable`] came about.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Taken unchanged from the source file
    Precomputed,
    /// Table has no rows, nothing to cluster
    Empty,
    /// Computed by k-means on the scaled features
    Fitted(KMeansFit),
}

/// A working table whose every row carries a cluster label.
#[derive(Debug, Clone)]
pub struct ClusteredTable {
    table: WorkingTable,
    assignment: Assignment,
}

impl ClusteredTable {
    pub fn table(&self) -> &WorkingTable {
        &self.table
    }

    pub fn labels(&self) -> &[ClusterLabel] {
        self.table.clusters().unwrap_or(&[])
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn into_inner(self) -> WorkingTable {
        self.table
    }
}

/// Price, rating and reviews as an `n x 3` matrix with missing values as 0.
///
/// The zeros only live in this matrix; the table keeps its missing cells.
pub fn feature_matrix(table: &WorkingTable) -> Array2<f64> {
    let nrows = table.n_rows();
    let mut x = Array2::<f64>::zeros((nrows, FEATURES.len()));
    for (j, field) in FEATURES.into_iter().enumerate() {
        if let Some(values) = table.numeric(field) {
            for (i, value) in values.iter().enumerate() {
                x[[i, j]] = value.unwrap_or(0.0);
            }
        }
    }
    x
}

#[derive(Debug, Clone, Default)]
pub struct ClusterAssigner {
    params: KMeansParams,
}

impl ClusterAssigner {
    pub fn new(params: KMeansParams) -> Self {
        Self { params }
    }

    /// Label every row of `table`.
    ///
    /// A table that already has a `cluster` column is returned untouched.
    /// Otherwise the features are standardized and clustered with k-means.
    pub fn assign(&self, mut table: WorkingTable) -> Result<ClusteredTable, ClusterError> {
        if table.has_cluster_column() {
            info!("cluster column present, skipping k-means");
            return Ok(ClusteredTable {
                table,
                assignment: Assignment::Precomputed,
            });
        }

        if table.n_rows() == 0 {
            info!("no products to cluster");
            table.set_clusters(Vec::new());
            return Ok(ClusteredTable {
                table,
                assignment: Assignment::Empty,
            });
        }

        let features = feature_matrix(&table);
        let (_, scaled) = StandardScaler::fit_transform(features.view());
        let fit = kmeans::fit(scaled.view(), &self.params)?;
        info!(
            "assigned {} products to {} clusters (inertia {:.3})",
            fit.labels.len(),
            fit.n_clusters(),
            fit.inertia
        );

        table.set_clusters(fit.labels.clone());
        Ok(ClusteredTable {
            table,
            assignment: Assignment::Fitted(fit),
        })
    }
}
