//! CSV sample ingest.
//!
//! Turns a headered CSV into paired `(x, y)` vectors that are safe to fit.
//!
//! Design goals:
//! - **Strict schema** for the two selected columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{debug, warn};

use crate::domain::DatasetStats;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: paired samples + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedData {
    pub fn rows_used(&self) -> usize {
        self.x.len()
    }
}

/// Load `(x, y)` samples from a CSV file.
pub fn load_samples(path: &Path, x_column: &str, y_column: &str) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_samples(file, x_column, y_column)?;
    debug!(
        "loaded {} of {} rows from '{}'",
        data.rows_used(),
        data.rows_read,
        path.display()
    );
    Ok(data)
}

/// Load `(x, y)` samples from any CSV reader.
pub fn read_samples<R: Read>(input: R, x_column: &str, y_column: &str) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_idx = column_index(&header_map, x_column)?;
    let y_idx = column_index(&header_map, y_column)?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let parsed = parse_value(&record, x_idx, x_column)
            .and_then(|xv| parse_value(&record, y_idx, y_column).map(|yv| (xv, yv)));
        match parsed {
            Ok((xv, yv)) => {
                x.push(xv);
                y.push(yv);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        warn!("skipped {} of {rows_read} CSV rows", row_errors.len());
    }

    let stats = DatasetStats::from_samples(&x, &y)
        .ok_or_else(|| AppError::new(3, "No valid rows remain after parsing."))?;

    Ok(IngestedData {
        x,
        y,
        stats,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the first column never matches.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn column_index(header_map: &HashMap<String, usize>, column: &str) -> Result<usize, AppError> {
    header_map
        .get(&normalize_header_name(column))
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{column}`")))
}

fn parse_value(record: &StringRecord, idx: usize, column: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing value for `{column}`"))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("invalid number for `{column}`: {raw:?}"))?;
    if !value.is_finite() {
        return Err(format!("non-finite value for `{column}`: {raw:?}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_selected_columns() {
        let csv = "\u{feff}X, label, Y\n-3, a, 3\n0, b, 1\n2, c, 1\n4, d, 3\n";
        let data = read_samples(csv.as_bytes(), "x", "y").unwrap();
        assert_eq!(data.x, vec![-3.0, 0.0, 2.0, 4.0]);
        assert_eq!(data.y, vec![3.0, 1.0, 1.0, 3.0]);
        assert_eq!(data.rows_read, 4);
        assert_eq!(data.rows_used(), 4);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.stats.x_min, -3.0);
        assert_eq!(data.stats.y_max, 3.0);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "x,y\n1,2\nfoo,3\n2,\n3,NaN\n4,5\n";
        let data = read_samples(csv.as_bytes(), "x", "y").unwrap();
        assert_eq!(data.x, vec![1.0, 4.0]);
        assert_eq!(data.y, vec![2.0, 5.0]);
        assert_eq!(data.rows_read, 5);
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let err = read_samples("a,b\n1,2\n".as_bytes(), "x", "b").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`x`"));
    }

    #[test]
    fn no_usable_rows_is_an_error() {
        let err = read_samples("x,y\nfoo,bar\n".as_bytes(), "x", "y").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn load_samples_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time,value").unwrap();
        writeln!(file, "0.5,1.25").unwrap();
        writeln!(file, "1.5,2.25").unwrap();
        let data = load_samples(file.path(), "time", "value").unwrap();
        assert_eq!(data.x, vec![0.5, 1.5]);
        assert_eq!(data.y, vec![1.25, 2.25]);

        let missing = load_samples(Path::new("/definitely/not/here.csv"), "x", "y").unwrap_err();
        assert_eq!(missing.exit_code(), 2);
    }
}
