//! Read/write holiday table JSON files.
//!
//! The file records the configuration the table was built for alongside the
//! curated records, so a table fetched once from the API can be reused
//! offline. The schema is defined by `domain::HolidayFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{Country, HolidayFile, HolidayTable};
use crate::error::AppError;

/// Write a curated holiday table as JSON.
pub fn write_holiday_json(
    path: &Path,
    table: &HolidayTable,
    years: &[i32],
    countries: &[Country],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create holiday JSON '{}': {e}", path.display())))?;

    let out = HolidayFile {
        tool: "calfeat".to_string(),
        years: years.to_vec(),
        countries: countries.to_vec(),
        holidays: table.records().to_vec(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write holiday JSON: {e}")))?;

    Ok(())
}

/// Read a holiday JSON file.
pub fn read_holiday_json(path: &Path) -> Result<HolidayFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open holiday JSON '{}': {e}", path.display())))?;
    let holidays: HolidayFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid holiday JSON: {e}")))?;
    Ok(holidays)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::HolidayRecord;

    #[test]
    fn holiday_file_keeps_configuration() {
        let table = HolidayTable::new(vec![HolidayRecord::new(
            NaiveDate::from_ymd_opt(2020, 7, 9).unwrap(),
            Country::Argentina,
        )]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holidays.json");
        write_holiday_json(&path, &table, &[2020], &[Country::Argentina]).unwrap();

        let back = read_holiday_json(&path).unwrap();
        assert_eq!(back.tool, "calfeat");
        assert_eq!(back.years, vec![2020]);
        assert_eq!(back.countries, vec![Country::Argentina]);
        assert_eq!(back.holidays, table.records());
    }
}
