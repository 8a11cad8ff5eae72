use crate::error::DataLoadError;
use crate::loader::Table;
use crate::numeric::coerce_column;
use crate::resolve::{resolve_columns, ColumnMapping, Field};
use std::sync::Arc;
use tracing::{debug, info};

/// Cluster index assigned to a product.
pub type ClusterLabel = usize;

/// Name of the column holding pre-computed cluster labels.
pub const CLUSTER_COLUMN: &str = "cluster";

/// The product table with its standard fields pulled out.
///
/// Text fields keep their raw cells, numeric fields are coerced and keep
/// `None` for anything missing or unparseable. The raw table stays
/// available for every other column.
#[derive(Debug, Clone)]
pub struct WorkingTable {
    raw: Arc<Table>,
    mapping: ColumnMapping,
    pub brand_name: Vec<Option<String>>,
    pub product_name: Vec<Option<String>>,
    pub price: Vec<Option<f64>>,
    pub rating: Vec<Option<f64>>,
    pub reviews: Vec<Option<f64>>,
    cluster: Option<Vec<ClusterLabel>>,
}

fn text_column(raw: &Table, column: Option<&str>) -> Vec<Option<String>> {
    match column.and_then(|c| raw.column_index(c)) {
        Some(idx) => raw.column(idx).map(|c| c.map(str::to_string)).collect(),
        None => vec![None; raw.n_rows()],
    }
}

fn numeric_column(raw: &Table, field: Field, column: Option<&str>) -> Vec<Option<f64>> {
    match column.and_then(|c| raw.column_index(c)) {
        Some(idx) => {
            let (values, failures) = coerce_column(raw.column(idx));
            if failures > 0 {
                debug!("{}: {} cells could not be parsed as numbers", field, failures);
            }
            values
        }
        None => vec![None; raw.n_rows()],
    }
}

fn parse_label(cell: &str) -> Option<ClusterLabel> {
    let cell = cell.trim();
    if let Ok(label) = cell.parse::<ClusterLabel>() {
        return Some(label);
    }
    // Labels written out by float-typed tools, e.g. "2.0"
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as ClusterLabel)
}

fn precomputed_clusters(raw: &Table) -> Result<Option<Vec<ClusterLabel>>, DataLoadError> {
    let Some(idx) = raw.column_index(CLUSTER_COLUMN) else {
        return Ok(None);
    };

    raw.column(idx)
        .enumerate()
        .map(|(row, cell)| {
            cell.and_then(parse_label)
                .ok_or_else(|| DataLoadError::InvalidClusterLabel {
                    row: row + 1,
                    value: cell.map(str::to_string),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

impl WorkingTable {
    /// Resolve the standard fields of `raw` and coerce the numeric ones.
    ///
    /// An existing `cluster` column is taken as authoritative and must hold a
    /// non-negative integer in every row.
    pub fn from_table(raw: Arc<Table>) -> Result<Self, DataLoadError> {
        let mapping = resolve_columns(raw.columns());
        let cluster = precomputed_clusters(&raw)?;
        if cluster.is_some() {
            info!("using pre-computed cluster column");
        }

        Ok(Self {
            brand_name: text_column(&raw, mapping.get(Field::BrandName)),
            product_name: text_column(&raw, mapping.get(Field::ProductName)),
            price: numeric_column(&raw, Field::Price, mapping.get(Field::Price)),
            rating: numeric_column(&raw, Field::Rating, mapping.get(Field::Rating)),
            reviews: numeric_column(&raw, Field::Reviews, mapping.get(Field::Reviews)),
            cluster,
            mapping,
            raw,
        })
    }

    pub fn raw(&self) -> &Table {
        &self.raw
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn n_rows(&self) -> usize {
        self.raw.n_rows()
    }

    pub fn has_cluster_column(&self) -> bool {
        self.cluster.is_some()
    }

    pub fn clusters(&self) -> Option<&[ClusterLabel]> {
        self.cluster.as_deref()
    }

    pub(crate) fn set_clusters(&mut self, labels: Vec<ClusterLabel>) {
        debug_assert_eq!(labels.len(), self.n_rows());
        self.cluster = Some(labels);
    }

    /// Values of a numeric standard field.
    pub fn numeric(&self, field: Field) -> Option<&[Option<f64>]> {
        match field {
            Field::Price => Some(&self.price),
            Field::Rating => Some(&self.rating),
            Field::Reviews => Some(&self.reviews),
            Field::BrandName | Field::ProductName => None,
        }
    }
}
