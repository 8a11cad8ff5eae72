use crate::error::DataLoadError;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Cell spellings that load as missing, matching the usual dataframe defaults.
pub const NA_TOKENS: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Products as loaded from disk: normalized column names, textual cells,
/// `None` for missing. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

/// Trim, lowercase and turn spaces into underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

fn parse_cell(raw: &str) -> Option<String> {
    if NA_TOKENS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// `.tsv` files are tab separated, everything else is read as CSV.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

fn read_error(path: &Path, err: csv::Error) -> DataLoadError {
    if !err.is_io_error() {
        return DataLoadError::Malformed {
            path: path.to_path_buf(),
            source: err,
        };
    }

    let source = match err.into_kind() {
        csv::ErrorKind::Io(source) => source,
        other => std::io::Error::new(std::io::ErrorKind::Other, format!("{:?}", other)),
    };
    DataLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    }
}

impl Table {
    /// Build a table from already split cells. Column names are normalized,
    /// cells go through the same missing-value rules as file input.
    pub fn from_cells<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) -> Self {
        let columns = headers
            .iter()
            .map(|h| normalize_column_name(h.as_ref()))
            .collect::<Vec<_>>();
        let rows = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<Option<String>> =
                    row.iter().map(|c| parse_cell(c.as_ref())).collect();
                cells.resize(columns.len(), None);
                cells
            })
            .collect();
        Self { columns, rows }
    }

    /// Read a delimited file with a header row.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|source| DataLoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(file, delimiter_for(path), path)
    }

    /// Read delimited text from any reader. `origin` is only used in errors.
    pub fn from_reader<R: Read>(
        reader: R,
        delimiter: u8,
        origin: &Path,
    ) -> Result<Self, DataLoadError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers().map_err(|e| read_error(origin, e))?;
        if headers.is_empty() {
            return Err(DataLoadError::Empty {
                path: origin.to_path_buf(),
            });
        }
        let columns: Vec<String> = headers.iter().map(normalize_column_name).collect();

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| read_error(origin, e))?;
            if record.len() > columns.len() {
                return Err(DataLoadError::TooManyFields {
                    path: origin.to_path_buf(),
                    record: i + 1,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            let mut row: Vec<Option<String>> = record.iter().map(parse_cell).collect();
            row.resize(columns.len(), None);
            rows.push(row);
        }

        debug!(
            "parsed {} rows x {} columns from {}",
            rows.len(),
            columns.len(),
            origin.display()
        );
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column with exactly this (normalized) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }
}

/// Loaded tables keyed by path, kept for the lifetime of the cache.
/// Failed loads are never stored.
#[derive(Debug, Default)]
pub struct LoaderCache {
    tables: HashMap<PathBuf, Arc<Table>>,
}

impl LoaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, reading it on first use.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<Table>, DataLoadError> {
        let path = path.as_ref();
        if let Some(table) = self.tables.get(path) {
            debug!("cache hit for {}", path.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(Table::from_path(path)?);
        info!(
            "loaded {} products ({} columns) from {}",
            table.n_rows(),
            table.n_cols(),
            path.display()
        );
        self.tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.tables.contains_key(path.as_ref())
    }

    /// Drop one entry so the next `load` rereads the file.
    pub fn invalidate<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.tables.remove(path.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(text: &str) -> Result<Table, DataLoadError> {
        Table::from_reader(text.as_bytes(), b',', Path::new("<memory>"))
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Product Brand "), "product_brand");
        assert_eq!(normalize_column_name("Price (Rp)"), "price_(rp)");
        assert_eq!(normalize_column_name("Num  Reviews"), "num__reviews");
    }

    #[test]
    fn test_missing_tokens_and_padding() {
        let table = parse("Brand,Price,Rating\nAvoskin,N/A,4.5\nSomethinc,,\nWardah\n").unwrap();
        assert_eq!(table.columns(), &["brand", "price", "rating"]);
        assert_eq!(table.n_rows(), 3);

        let price: Vec<_> = table.column(1).collect();
        assert_eq!(price, vec![None, None, None]);
        let rating: Vec<_> = table.column(2).collect();
        assert_eq!(rating, vec![Some("4.5"), None, None]);
    }

    #[test]
    fn test_too_many_fields() {
        let err = parse("a,b\n1,2\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::TooManyFields { record: 2, expected: 2, found: 3, .. }
        ));
    }

    #[test]
    fn test_empty_input_and_header_only() {
        assert!(matches!(parse(""), Err(DataLoadError::Empty { .. })));

        let table = parse("brand,price\n").unwrap();
        assert_eq!(table.n_rows(), 0);
        assert_eq!(table.n_cols(), 2);
    }

    #[test]
    fn test_file_not_found() {
        let err = Table::from_path("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound { .. }));
        assert!(err.is_missing_file());
    }

    #[test]
    fn test_tsv_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "Brand Name\tPrice").unwrap();
        writeln!(file, "Avoskin\t150000").unwrap();

        let table = Table::from_path(file.path()).unwrap();
        assert_eq!(table.columns(), &["brand_name", "price"]);
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec![Some("150000")]);
    }

    #[test]
    fn test_cache_reuses_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "brand,price").unwrap();
        writeln!(file, "Avoskin,1").unwrap();

        let mut cache = LoaderCache::new();
        let first = cache.load(file.path()).unwrap();
        let second = cache.load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        assert!(cache.invalidate(file.path()));
        let third = cache.load(file.path()).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains(file.path()));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"brand,price\n\xff\xfe,1\n";
        let err = Table::from_reader(bytes, b',', Path::new("<memory>")).unwrap_err();
        assert!(matches!(err, DataLoadError::Malformed { .. }));
        assert!(!err.is_missing_file());
    }

    struct DeniedReader;

    impl Read for DeniedReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_io_error_kind_kept() {
        let err = Table::from_reader(DeniedReader, b',', Path::new("<memory>")).unwrap_err();
        match err {
            DataLoadError::Unreadable { ref source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied)
            }
            ref other => panic!("expected Unreadable, got {:?}", other),
        }
        assert!(err.is_missing_file());
    }

    #[test]
    fn test_cache_skips_failures() {
        let mut cache = LoaderCache::new();
        assert!(cache.load("missing.csv").is_err());
        assert!(cache.is_empty());
        assert!(!cache.contains("missing.csv"));
    }
}
