//! Lenient numeric coercion. Anything that does not parse becomes missing.

/// Parse one cell as a finite number.
///
/// Leading/trailing whitespace is ignored. Missing cells, non-numeric text,
/// thousands separators and `inf`/`nan` spellings all yield `None`.
pub fn to_numeric(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Coerce a whole column. Returns the values and how many present cells
/// failed to parse.
pub fn coerce_column<'a, I>(cells: I) -> (Vec<Option<f64>>, usize)
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut failures = 0;
    let values = cells
        .into_iter()
        .map(|cell| {
            let value = to_numeric(cell);
            if value.is_none() && cell.is_some() {
                failures += 1;
            }
            value
        })
        .collect();
    (values, failures)
}
