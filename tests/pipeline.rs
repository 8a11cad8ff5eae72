//! End-to-end runs over catalog files on disk

use skincare_clusters::{
    Assignment, DataLoadError, Error, Field, Pipeline, PipelineConfig, Summary,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn catalog() -> NamedTempFile {
    write_csv(&[
        "Product Brand,Product Title,Price (Rp),User Rating,Num Reviews",
        "Avoskin,Serum A,150000,4.5,200",
        "Somethinc,Serum B,120000,4.2,150",
        "Wardah,Toner,35000,4.0,1200",
        "Wardah,Sunscreen,N/A,4.6,5400",
        "Skintific,Moisturizer,139000,4.8,9800",
        "Avoskin,Toner,99000,,12",
        "Emina,Cleanser,25000,3.9,",
        "Somethinc,Sunscreen,79000,4.4,3100",
        "Hada Labo,Lotion,45000,4.7,15000",
        "Emina,Lip Balm,18000,3.5,40",
    ])
}

#[test]
fn test_end_to_end() {
    let file = catalog();
    let mut pipeline = Pipeline::new(PipelineConfig::new(file.path()));
    let output = pipeline.run().unwrap();
    let table = output.table.table();

    let mapping = table.mapping();
    assert_eq!(mapping.get(Field::BrandName), Some("product_brand"));
    assert_eq!(mapping.get(Field::ProductName), Some("product_title"));
    assert_eq!(mapping.get(Field::Price), Some("price_(rp)"));
    assert_eq!(mapping.get(Field::Rating), Some("user_rating"));
    assert_eq!(mapping.get(Field::Reviews), Some("num_reviews"));

    // every row labelled
    assert_eq!(output.table.labels().len(), 10);
    assert!(output.table.labels().iter().all(|&c| c < 4));
    assert!(matches!(output.table.assignment(), Assignment::Fitted(_)));

    // missing values survive clustering
    assert_eq!(table.price[3], None);
    assert_eq!(table.rating[5], None);
    assert_eq!(table.reviews[6], None);

    let summary = &output.summary;
    assert_eq!(summary.product_count, 10);
    assert_eq!(summary.brand_count, 6);
    assert_eq!(summary.total_reviews, 34902);
    assert_eq!(
        summary.cluster_sizes.iter().map(|s| s.count).sum::<usize>(),
        10
    );
    assert_eq!(summary.cluster_count, summary.cluster_sizes.len());
}

#[test]
fn test_reproducible_runs() {
    let file = catalog();
    let first = Pipeline::new(PipelineConfig::new(file.path())).run().unwrap();
    let second = Pipeline::new(PipelineConfig::new(file.path())).run().unwrap();
    assert_eq!(first.table.labels(), second.table.labels());
    assert_eq!(first.summary, second.summary);
}

#[test]
fn test_two_rows_fewer_than_clusters() {
    let file = write_csv(&[
        "Product Brand,Product Title,Price (Rp),User Rating,Num Reviews",
        "Avoskin,Serum A,150000,4.5,200",
        "Somethinc,Serum B,120000,4.2,150",
    ]);
    let output = Pipeline::new(PipelineConfig::new(file.path())).run().unwrap();

    assert_eq!(output.table.table().price, vec![Some(150000.0), Some(120000.0)]);
    let labels = output.table.labels();
    assert_eq!(labels.len(), 2);
    assert_ne!(labels[0], labels[1]);
    assert_eq!(output.summary.cluster_count, 2);
}

#[test]
fn test_precomputed_clusters_kept() {
    let file = write_csv(&[
        "brand,product,price,rating,reviews,Cluster",
        "A,p1,10,4,1,2",
        "B,p2,20,4,2,2",
        "A,p3,30,4,3,0",
    ]);
    let output = Pipeline::new(PipelineConfig::new(file.path())).run().unwrap();

    assert_eq!(output.table.assignment(), &Assignment::Precomputed);
    assert_eq!(output.table.labels(), &[2, 2, 0]);

    let summary: &Summary = &output.summary;
    assert_eq!(summary.product_count, 3);
    assert_eq!(summary.brand_count, 2);
    assert_eq!(summary.cluster_count, 2);
}

#[test]
fn test_no_recognizable_columns() {
    let file = write_csv(&["sku,notes", "1,x", "2,y", "3,z"]);
    let output = Pipeline::new(PipelineConfig::new(file.path())).run().unwrap();

    assert_eq!(output.table.labels().len(), 3);
    assert_eq!(output.summary.brand_count, 0);
    assert_eq!(output.summary.total_reviews, 0);
    assert!(output.summary.top_brands.is_empty());
}

#[test]
fn test_header_only_file() {
    let file = write_csv(&["brand,price,rating,reviews"]);
    let output = Pipeline::new(PipelineConfig::new(file.path())).run().unwrap();
    assert_eq!(output.table.assignment(), &Assignment::Empty);
    assert_eq!(output.summary.product_count, 0);
}

#[test]
fn test_load_errors_are_distinguishable() {
    let mut missing = Pipeline::new(PipelineConfig::new("does/not/exist.csv"));
    match missing.run() {
        Err(Error::Load(e)) => assert!(e.is_missing_file()),
        other => panic!("unexpected result: {:?}", other.map(|o| o.summary)),
    }

    let file = write_csv(&["brand,price", "A,1,extra"]);
    let mut malformed = Pipeline::new(PipelineConfig::new(file.path()));
    match malformed.run() {
        Err(Error::Load(e)) => {
            assert!(!e.is_missing_file());
            assert!(matches!(e, DataLoadError::TooManyFields { .. }));
        }
        other => panic!("unexpected result: {:?}", other.map(|o| o.summary)),
    }
}
