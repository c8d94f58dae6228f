//! Date-derived columns.

use chrono::{Datelike, NaiveDate};

use crate::domain::columns::{DATE, DAY, DAY_OF_YEAR, MONTH, TIME_NO, WEEK, YEAR};
use crate::domain::{Column, FeatureTable};
use crate::error::FeatureError;

/// Add `day`, `week` (Monday = 0), `month`, `year`, `day_of_year` and `time_no`.
///
/// `time_no` counts days from 2017-01-01 and skips 2020-02-29, so the same
/// calendar day keeps the same distance between years.
///
/// Returns the date-related column names used as model inputs.
pub fn expand_time(target: &mut FeatureTable) -> Result<Vec<String>, FeatureError> {
    let dates = target.dates(DATE)?.to_vec();

    let pick = |f: fn(&NaiveDate) -> i64| Column::Int(dates.iter().map(f).collect());

    target.insert(DAY, pick(|d| i64::from(d.day())))?;
    target.insert(WEEK, pick(|d| i64::from(d.weekday().num_days_from_monday())))?;
    target.insert(MONTH, pick(|d| i64::from(d.month())))?;
    target.insert(YEAR, pick(|d| i64::from(d.year())))?;
    target.insert(DAY_OF_YEAR, pick(|d| i64::from(d.ordinal())))?;
    target.insert(TIME_NO, pick(time_no))?;

    Ok([DATE, DAY, WEEK, MONTH, YEAR, TIME_NO]
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// Day 0 of `time_no`.
const TIME_ORIGIN: NaiveDate = const_date(2017, 1, 1);
/// The one leap day inside the data range; later days shift back by one.
const SKIPPED_LEAP_DAY: NaiveDate = const_date(2020, 2, 29);

const fn const_date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar constant"),
    }
}

fn time_no(date: &NaiveDate) -> i64 {
    let days = (*date - TIME_ORIGIN).num_days();
    if *date > SKIPPED_LEAP_DAY { days - 1 } else { days }
}
