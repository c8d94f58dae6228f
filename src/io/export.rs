//! Export a feature table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or by the model
//! training scripts: all columns in table order, ISO dates, floats printed
//! with full precision and NaN as an empty cell.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::domain::{Column, FeatureTable};
use crate::error::AppError;

/// Write every column of `table` to a CSV file.
pub fn write_feature_csv(path: &Path, table: &FeatureTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    let columns: Vec<(&str, &Column)> = table.columns().collect();

    writer
        .write_record(columns.iter().map(|(name, _)| *name))
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in 0..table.len() {
        writer
            .write_record(columns.iter().map(|(_, col)| col.format_cell(row)))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = table.len(), "wrote feature table");
    Ok(())
}
