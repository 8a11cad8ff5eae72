//! Dashboard figures derived from a clustered product table.

use crate::cluster::ClusteredTable;
use crate::working::{ClusterLabel, WorkingTable};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// How many brands the brand-by-cluster breakdown keeps.
pub const TOP_BRANDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSize {
    pub cluster: ClusterLabel,
    pub count: usize,
}

/// Means over the present values of each cluster; `None` when a cluster
/// has no value for that field at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMeans {
    pub cluster: ClusterLabel,
    pub mean_price: Option<f64>,
    pub mean_reviews: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandClusterCount {
    pub cluster: ClusterLabel,
    pub brand: String,
    pub count: usize,
}

/// Everything a dashboard shows about one clustered catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub product_count: usize,
    /// Distinct non-missing brand names
    pub brand_count: usize,
    pub cluster_count: usize,
    /// Sum of present review counts, truncated toward zero
    pub total_reviews: i64,
    /// Products per cluster, ascending by label
    pub cluster_sizes: Vec<ClusterSize>,
    pub cluster_means: Vec<ClusterMeans>,
    /// Product counts per (cluster, brand), restricted to the top brands
    pub top_brands: Vec<BrandClusterCount>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    fn get(self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

impl Summary {
    pub fn from_clustered(clustered: &ClusteredTable) -> Self {
        Self::compute(clustered.table(), clustered.labels())
    }

    /// `labels` holds one cluster per row of `table`.
    pub fn compute(table: &WorkingTable, labels: &[ClusterLabel]) -> Self {
        let brands = &table.brand_name;

        let brand_count = brands
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len();

        let total_reviews = table.reviews.iter().flatten().sum::<f64>() as i64;

        let mut sizes: BTreeMap<ClusterLabel, usize> = BTreeMap::new();
        let mut means: BTreeMap<ClusterLabel, (Mean, Mean)> = BTreeMap::new();
        for (i, &label) in labels.iter().enumerate() {
            *sizes.entry(label).or_default() += 1;
            let (price, reviews) = means.entry(label).or_default();
            price.push(table.price.get(i).copied().flatten());
            reviews.push(table.reviews.get(i).copied().flatten());
        }

        Self {
            product_count: table.n_rows(),
            brand_count,
            cluster_count: sizes.len(),
            total_reviews,
            cluster_sizes: sizes
                .into_iter()
                .map(|(cluster, count)| ClusterSize { cluster, count })
                .collect(),
            cluster_means: means
                .into_iter()
                .map(|(cluster, (price, reviews))| ClusterMeans {
                    cluster,
                    mean_price: price.get(),
                    mean_reviews: reviews.get(),
                })
                .collect(),
            top_brands: top_brands_by_cluster(brands, labels, TOP_BRANDS),
        }
    }

    /// Share of products in each cluster, in percent.
    pub fn cluster_shares(&self) -> Vec<(ClusterLabel, f64)> {
        self.cluster_sizes
            .iter()
            .map(|s| {
                let share = if self.product_count == 0 {
                    0.0
                } else {
                    s.count as f64 * 100.0 / self.product_count as f64
                };
                (s.cluster, share)
            })
            .collect()
    }
}

/// Per-cluster counts of the `limit` most frequent brands overall.
///
/// Brands rank by total count, ties by name. Rows come out ordered by
/// cluster, then brand. Rows without a brand are ignored.
pub fn top_brands_by_cluster(
    brands: &[Option<String>],
    labels: &[ClusterLabel],
    limit: usize,
) -> Vec<BrandClusterCount> {
    let mut groups: BTreeMap<(ClusterLabel, &str), usize> = BTreeMap::new();
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for (brand, &label) in brands.iter().zip(labels) {
        if let Some(brand) = brand.as_deref() {
            *groups.entry((label, brand)).or_default() += 1;
            *totals.entry(brand).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top: BTreeSet<&str> = ranked.into_iter().take(limit).map(|(b, _)| b).collect();

    groups
        .into_iter()
        .filter(|((_, brand), _)| top.contains(brand))
        .map(|((cluster, brand), count)| BrandClusterCount {
            cluster,
            brand: brand.to_string(),
            count,
        })
        .collect()
}
