use crate::cluster::{ClusterAssigner, ClusteredTable};
use crate::config::PipelineConfig;
use crate::error::{DataLoadError, Result};
use crate::loader::{LoaderCache, Table};
use crate::summary::Summary;
use crate::working::WorkingTable;
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of one full run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: ClusteredTable,
    pub summary: Summary,
}

/// Load -> standardize -> cluster -> summarize, in that order.
///
/// Owns the loader cache, so repeated runs over the same path read the file
/// once.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    cache: LoaderCache,
    assigner: ClusterAssigner,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let assigner = ClusterAssigner::new(config.kmeans.clone());
        Self {
            config,
            cache: LoaderCache::new(),
            assigner,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &LoaderCache {
        &self.cache
    }

    pub fn load(&mut self) -> std::result::Result<Arc<Table>, DataLoadError> {
        self.cache.load(&self.config.data_path)
    }

    pub fn prepare(&mut self) -> std::result::Result<WorkingTable, DataLoadError> {
        let raw = self.load()?;
        WorkingTable::from_table(raw)
    }

    pub fn cluster(&mut self) -> Result<ClusteredTable> {
        let table = self.prepare()?;
        Ok(self.assigner.assign(table)?)
    }

    #[instrument(level = "info", skip(self), fields(path = %self.config.data_path.display()))]
    pub fn run(&mut self) -> Result<PipelineOutput> {
        let table = self.cluster()?;
        let summary = Summary::from_clustered(&table);
        info!(
            products = summary.product_count,
            brands = summary.brand_count,
            clusters = summary.cluster_count,
            "pipeline complete"
        );
        Ok(PipelineOutput { table, summary })
    }
}
