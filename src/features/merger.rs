//! Holiday feature merger.
//!
//! For every kernel offset `k`, the curated holidays are shifted forward by
//! `k` days and joined onto the target rows by `(date, country)`. Each match
//! adds `kernel[k]` to the row, so overlapping holidays compound.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::domain::columns::{COUNTRY, DATE, HOLIDAY};
use crate::domain::{Column, Country, FeatureTable, HolidayTable};
use crate::error::FeatureError;
use crate::features::kernel::InfluenceKernel;

/// Compute the `holiday` feature, one value per row of `target`, in row order.
pub fn apply_holiday_feature(
    target: &FeatureTable,
    holidays: &HolidayTable,
    kernel: &InfluenceKernel,
) -> Result<Vec<f64>, FeatureError> {
    target.require(&[DATE, COUNTRY])?;
    let dates = target.dates(DATE)?;
    let countries: Vec<Option<Country>> = target
        .texts(COUNTRY)?
        .iter()
        .map(|name| Country::from_name(name))
        .collect();

    let mut feature = vec![0.0; target.len()];

    for (offset, weight) in kernel.iter() {
        let shifted = shifted_counts(holidays, offset as i64);
        if shifted.is_empty() {
            continue;
        }
        for (row, (date, country)) in dates.iter().zip(&countries).enumerate() {
            let Some(country) = country else { continue };
            if let Some(&hits) = shifted.get(&(*date, *country)) {
                feature[row] += weight * HolidayTable::MARKER * hits as f64;
            }
        }
    }

    Ok(feature)
}

/// Compute the feature and store it in `target` as the `holiday` column.
pub fn add_holiday_column(
    target: &mut FeatureTable,
    holidays: &HolidayTable,
    kernel: &InfluenceKernel,
) -> Result<(), FeatureError> {
    let feature = apply_holiday_feature(target, holidays, kernel)?;
    target.insert(HOLIDAY, Column::Float(feature))
}

/// Holiday multiplicity keyed by `(date + offset, country)`.
fn shifted_counts(holidays: &HolidayTable, offset: i64) -> HashMap<(NaiveDate, Country), usize> {
    let mut counts = HashMap::with_capacity(holidays.len());
    for record in holidays.iter() {
        let Some(date) = record.date.checked_add_signed(Duration::days(offset)) else {
            continue;
        };
        *counts.entry((date, record.country)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HolidayRecord;
    use crate::features::kernel::influence_kernel;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn target(rows: &[(NaiveDate, &str)]) -> FeatureTable {
        let mut t = FeatureTable::new();
        t.insert(DATE, Column::Date(rows.iter().map(|r| r.0).collect()))
            .unwrap();
        t.insert(COUNTRY, Column::Text(rows.iter().map(|r| r.1.to_string()).collect()))
            .unwrap();
        t
    }

    fn ramp() -> InfluenceKernel {
        InfluenceKernel::from_weights((1..=11).map(f64::from).collect())
    }

    #[test]
    fn single_holiday_picks_offset_weight() {
        let holidays = HolidayTable::new(vec![HolidayRecord::new(d(2023, 12, 1), Country::Spain)]);
        let t = target(&[(d(2023, 12, 5), "Spain")]);
        let out = apply_holiday_feature(&t, &holidays, &ramp()).unwrap();
        assert_eq!(out, vec![5.0]);
    }

    #[test]
    fn overlapping_holidays_add_up() {
        let holidays = HolidayTable::new(vec![
            HolidayRecord::new(d(2021, 5, 1), Country::Argentina),
            HolidayRecord::new(d(2021, 5, 3), Country::Argentina),
        ]);
        let t = target(&[(d(2021, 5, 6), "Argentina")]);
        let out = apply_holiday_feature(&t, &holidays, &ramp()).unwrap();
        // offset 5 from May 1 (weight 6) plus offset 3 from May 3 (weight 4)
        assert_eq!(out, vec![10.0]);
    }

    #[test]
    fn duplicate_records_each_contribute() {
        let rec = HolidayRecord::new(d(2021, 5, 1), Country::Argentina);
        let holidays = HolidayTable::new(vec![rec, rec]);
        let t = target(&[(d(2021, 5, 1), "Argentina")]);
        let out = apply_holiday_feature(&t, &holidays, &ramp()).unwrap();
        assert_eq!(out, vec![2.0]);
    }

    #[test]
    fn empty_holiday_table_gives_zeros() {
        let t = target(&[(d(2021, 1, 1), "Spain"), (d(2021, 1, 2), "Japan")]);
        let out = apply_holiday_feature(&t, &HolidayTable::default(), &influence_kernel()).unwrap();
        assert_eq!(out, vec![0.0, 0.0]);
    }

    #[test]
    fn matching_requires_same_country_and_stays_in_row_order() {
        let holidays = HolidayTable::new(vec![HolidayRecord::new(d(2022, 7, 9), Country::Argentina)]);
        let t = target(&[
            (d(2022, 7, 12), "Spain"),
            (d(2022, 7, 12), "Argentina"),
            (d(2022, 7, 8), "Argentina"),
            (d(2022, 7, 25), "Argentina"),
            (d(2022, 7, 12), "Atlantis"),
        ]);
        let out = apply_holiday_feature(&t, &holidays, &ramp()).unwrap();
        assert_eq!(out, vec![0.0, 4.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn country_cells_must_match_exactly() {
        let holidays = HolidayTable::new(vec![HolidayRecord::new(d(2023, 12, 1), Country::Spain)]);
        let t = target(&[
            (d(2023, 12, 5), "Spain"),
            (d(2023, 12, 5), "spain"),
            (d(2023, 12, 5), "Spain "),
        ]);
        let out = apply_holiday_feature(&t, &holidays, &ramp()).unwrap();
        assert_eq!(out, vec![5.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_country_column_fails_before_writing() {
        let mut t = FeatureTable::new();
        t.insert(DATE, Column::Date(vec![d(2020, 1, 1)])).unwrap();
        let err = add_holiday_column(&mut t, &HolidayTable::default(), &influence_kernel()).unwrap_err();
        assert_eq!(err, FeatureError::MissingColumn(COUNTRY.to_string()));
        assert!(!t.has_column(HOLIDAY));
    }
}
