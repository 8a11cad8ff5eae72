use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn the configured file into a table. Always fatal.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("data file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed content in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("record {record} in {} has {found} fields, header has {expected}", .path.display())]
    TooManyFields {
        path: PathBuf,
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("{} has no header row", .path.display())]
    Empty { path: PathBuf },

    #[error("row {row}: invalid cluster label {value:?}")]
    InvalidClusterLabel { row: usize, value: Option<String> },
}

impl DataLoadError {
    /// True when the file could not be found or opened, as opposed to
    /// being present with bad content.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Unreadable { .. })
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ClusterError {
    #[error("cannot cluster an empty feature matrix")]
    EmptyInput,

    #[error("invalid k-means parameters: {0}")]
    InvalidParams(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] DataLoadError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

pub type Result<T> = std::result::Result<T, Error>;
