//! Keyword resolution of the five standard product fields.
//!
//! Source files name their columns freely ("Product Brand", "Price (Rp)",
//! "Num Reviews", ...). Each standard field carries a list of keywords in
//! priority order and is mapped to the first column whose normalized name
//! contains one of them.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Standard fields of the working table, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    BrandName,
    ProductName,
    Price,
    Rating,
    Reviews,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::BrandName,
        Field::ProductName,
        Field::Price,
        Field::Rating,
        Field::Reviews,
    ];

    /// Name of the standardized column in the working table.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::BrandName => "brand_name",
            Field::ProductName => "product_name",
            Field::Price => "price",
            Field::Rating => "rating",
            Field::Reviews => "reviews",
        }
    }

    /// Substrings searched for, highest priority first.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Field::BrandName => &["brand"],
            Field::ProductName => &["product"],
            Field::Price => &["price"],
            Field::Rating => &["rating"],
            Field::Reviews => &["review"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Physical column chosen for each standard field, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ColumnMapping {
    brand_name: Option<String>,
    product_name: Option<String>,
    price: Option<String>,
    rating: Option<String>,
    reviews: Option<String>,
}

impl ColumnMapping {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::BrandName => &self.brand_name,
            Field::ProductName => &self.product_name,
            Field::Price => &self.price,
            Field::Rating => &self.rating,
            Field::Reviews => &self.reviews,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::BrandName => &mut self.brand_name,
            Field::ProductName => &mut self.product_name,
            Field::Price => &mut self.price,
            Field::Rating => &mut self.rating,
            Field::Reviews => &mut self.reviews,
        }
    }

    pub fn unresolved(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}

/// First column containing one of `keywords`, trying keywords in order.
/// Columns listed in `claimed` are passed over.
fn find_column<'a>(columns: &'a [String], keywords: &[&str], claimed: &[&str]) -> Option<&'a str> {
    keywords.iter().find_map(|kw| {
        columns
            .iter()
            .map(String::as_str)
            .find(|c| c.contains(kw) && !claimed.contains(c))
    })
}

/// Map every standard field to a physical column.
///
/// Fields are resolved in [`Field::ALL`] order. A column already taken by an
/// earlier field is skipped while another match exists, so "product_brand"
/// and "product_title" become brand and product name respectively. When the
/// only matches are taken, the first one is shared. Fields without any match
/// stay unresolved.
pub fn resolve_columns<S: AsRef<str>>(columns: &[S]) -> ColumnMapping {
    let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_lowercase()).collect();
    let mut mapping = ColumnMapping::default();
    let mut claimed: Vec<&str> = Vec::new();

    for field in Field::ALL {
        let keywords = field.keywords();
        let found = find_column(&columns, keywords, &claimed)
            .or_else(|| find_column(&columns, keywords, &[]));

        match found {
            Some(column) => {
                debug!("{} -> {}", field, column);
                claimed.push(column);
                *mapping.slot_mut(field) = Some(column.to_string());
            }
            None => warn!("no column matches {} (keywords {:?})", field, keywords),
        }
    }

    mapping
}
