//! CSV ingest and normalization.
//!
//! This module is responsible for turning a sales CSV (train, test or
//! predictions) into a typed [`FeatureTable`].
//!
//! Design goals:
//! - **Strict schema** for the `date` column (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic typing**: a column is integer if every cell parses as an
//!   integer, float if every cell parses as a number, text otherwise
//! - **Separation of concerns**: no feature logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::columns::DATE;
use crate::domain::{Column, FeatureTable};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: typed table + row errors.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub path: PathBuf,
    pub table: FeatureTable,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a sales CSV into a typed table.
pub fn load_sales_table(path: &Path) -> Result<IngestedTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let header_map = build_header_map(&headers);
    let Some(&date_idx) = header_map.get(DATE) else {
        return Err(AppError::new(2, "Missing required column: `date`"));
    };

    let mut dates = Vec::new();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
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

        match parse_row(&record, names.len(), date_idx) {
            Ok(date) => {
                dates.push(date);
                for (col, cell) in cells.iter_mut().enumerate() {
                    col_push(cell, &record, col);
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = dates.len();
    if rows_used == 0 {
        return Err(AppError::new(
            3,
            format!("No valid rows in '{}'.", path.display()),
        ));
    }
    if !row_errors.is_empty() {
        warn!(path = %path.display(), skipped = row_errors.len(), "skipped invalid rows");
    }

    let mut table = FeatureTable::new();
    for (col, (name, values)) in names.into_iter().zip(cells).enumerate() {
        let column = if col == date_idx {
            Column::Date(std::mem::take(&mut dates))
        } else {
            infer_column(values)
        };
        table.insert(name, column)?;
    }

    info!(path = %path.display(), rows = rows_used, columns = table.column_names().count(), "loaded table");

    Ok(IngestedTable {
        path: path.to_path_buf(),
        table,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn col_push(cell: &mut Vec<String>, record: &StringRecord, col: usize) {
    cell.push(record.get(col).unwrap_or("").to_string());
}

fn parse_row(record: &StringRecord, width: usize, date_idx: usize) -> Result<NaiveDate, String> {
    if record.len() != width {
        return Err(format!("Expected {width} fields, found {}.", record.len()));
    }
    let raw = record
        .get(date_idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing required value: `date`".to_string())?;
    parse_date(raw)
}

/// Integer if every cell is an integer, float if every cell is numeric
/// (empty cells become NaN), text otherwise.
fn infer_column(values: Vec<String>) -> Column {
    if !values.is_empty() && values.iter().all(|v| v.parse::<i64>().is_ok()) {
        return Column::Int(values.iter().filter_map(|v| v.parse().ok()).collect());
    }

    let floats: Option<Vec<f64>> = values
        .iter()
        .map(|v| {
            if v.is_empty() {
                Some(f64::NAN)
            } else {
                v.parse::<f64>().ok()
            }
        })
        .collect();
    let has_number = values.iter().any(|v| !v.is_empty());

    match floats {
        Some(floats) if has_number => Column::Float(floats),
        _ => Column::Text(values),
    }
}

pub(crate) fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿id"). If we don't strip it, schema validation will
    // incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO dates are the norm, but spreadsheet exports often use `DD/MM/YYYY`.
    // Only a fixed set of formats is accepted to keep parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    let s = s.trim();
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(parse_date("2021-03-07").unwrap(), expected);
        assert_eq!(parse_date("07/03/2021").unwrap(), expected);
        assert_eq!(parse_date(" 2021/03/07 ").unwrap(), expected);
        assert!(parse_date("March 7").is_err());
    }

    #[test]
    fn infers_column_types() {
        assert!(matches!(infer_column(vec!["1".into(), "2".into()]), Column::Int(_)));
        assert!(matches!(infer_column(vec!["1".into(), "2.5".into()]), Column::Float(_)));
        assert!(matches!(infer_column(vec!["".into(), "2.5".into()]), Column::Float(_)));
        assert!(matches!(infer_column(vec!["".into(), "".into()]), Column::Text(_)));
        assert!(matches!(infer_column(vec!["Spain".into(), "3".into()]), Column::Text(_)));
    }

    #[test]
    fn loads_table_and_skips_bad_rows() {
        let file = write_csv(
            "\u{feff}id,date,country,store,product,num_sold\n\
             0,2017-01-01,Argentina,Kaggle Store,Using LLMs to Improve Your Coding,63\n\
             1,not-a-date,Argentina,Kaggle Store,Using LLMs to Write Better,66\n\
             2,2017-01-02,Canada,Kaggle Store,Using LLMs to Train More LLMs,9\n\
             3,2017-01-03,Canada\n",
        );
        let ingest = load_sales_table(file.path()).unwrap();

        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.rows_used, 2);
        assert_eq!(ingest.row_errors.len(), 2);
        assert_eq!(ingest.row_errors[0].line, 3);

        let t = &ingest.table;
        assert_eq!(t.len(), 2);
        assert_eq!(t.ints("id").unwrap(), &[0, 2]);
        assert_eq!(t.texts("country").unwrap(), &["Argentina".to_string(), "Canada".to_string()]);
        assert_eq!(t.ints("num_sold").unwrap(), &[63, 9]);
        assert_eq!(t.dates("date").unwrap()[1], NaiveDate::from_ymd_opt(2017, 1, 2).unwrap());
    }

    #[test]
    fn missing_date_header_is_an_input_error() {
        let file = write_csv("id,country\n0,Spain\n");
        assert_eq!(load_sales_table(file.path()).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn no_valid_rows_is_a_data_error() {
        let file = write_csv("date,country\nbad,Spain\n");
        assert_eq!(load_sales_table(file.path()).unwrap_err().exit_code(), 3);
    }
}
