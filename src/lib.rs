//! Skincare catalog segmentation.
//!
//! Reads a product table from CSV/TSV, maps its free-form columns onto brand,
//! product name, price, rating and review count, and splits the products
//! into four groups with K-means on the standardized numeric fields. The
//! [`Summary`] carries the figures a dashboard shows about the result.

pub mod cluster;
pub mod config;
pub mod error;
pub mod kmeans;
pub mod loader;
pub mod numeric;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod scaler;
pub mod summary;
pub mod working;

pub use cluster::{Assignment, ClusterAssigner, ClusteredTable};
pub use config::{KMeansParams, PipelineConfig};
pub use error::{ClusterError, DataLoadError, Error, Result};
pub use loader::{LoaderCache, Table};
pub use pipeline::{Pipeline, PipelineOutput};
pub use resolve::{resolve_columns, ColumnMapping, Field};
pub use summary::Summary;
pub use working::{ClusterLabel, WorkingTable};
