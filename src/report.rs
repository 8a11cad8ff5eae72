//! Plain-text rendering of a [`Summary`].

use crate::summary::Summary;
use std::fmt;

/// `1234567` -> `"1,234,567"`
pub fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Renders the four cards, the cluster distribution, per-cluster means and
/// the brand breakdown.
pub struct TextReport<'a>(pub &'a Summary);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "Skincare Dashboard")?;
        writeln!(f, "==================")?;
        writeln!(
            f,
            "Products: {}  Brands: {}  Clusters: {}  Reviews: {}",
            thousands(s.product_count as i64),
            thousands(s.brand_count as i64),
            thousands(s.cluster_count as i64),
            thousands(s.total_reviews)
        )?;

        writeln!(f, "\nProducts per cluster")?;
        for (size, (_, share)) in s.cluster_sizes.iter().zip(s.cluster_shares()) {
            writeln!(f, "  Cluster {}: {} ({:.1}%)", size.cluster, thousands(size.count as i64), share)?;
        }

        writeln!(f, "\nAverage price and reviews by cluster")?;
        writeln!(f, "  {:>7} | {:>14} | {:>12}", "cluster", "price", "reviews")?;
        for m in &s.cluster_means {
            writeln!(f, "  {:>7} | {:>14} | {:>12}", m.cluster, opt(m.mean_price), opt(m.mean_reviews))?;
        }

        writeln!(f, "\nTop brands across clusters")?;
        let width = s.top_brands.iter().map(|r| r.brand.len()).max().unwrap_or(5).max(5);
        for row in &s.top_brands {
            writeln!(f, "  {:<width$} | cluster {} | {}", row.brand, row.cluster, row.count, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{BrandClusterCount, ClusterMeans, ClusterSize};

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
        assert_eq!(thousands(-45000), "-45,000");
    }

    #[test]
    fn test_text_report() {
        let summary = Summary {
            product_count: 1200,
            brand_count: 2,
            cluster_count: 1,
            total_reviews: 15000,
            cluster_sizes: vec![ClusterSize { cluster: 0, count: 1200 }],
            cluster_means: vec![ClusterMeans {
                cluster: 0,
                mean_price: Some(120000.0),
                mean_reviews: None,
            }],
            top_brands: vec![BrandClusterCount {
                cluster: 0,
                brand: "Avoskin".into(),
                count: 1200,
            }],
        };
        let text = TextReport(&summary).to_string();
        assert!(text.contains("Products: 1,200"));
        assert!(text.contains("Reviews: 15,000"));
        assert!(text.contains("Cluster 0: 1,200 (100.0%)"));
        assert!(text.contains("120000.00"));
        assert!(text.contains("Avoskin | cluster 0 | 1200"));
    }
}
