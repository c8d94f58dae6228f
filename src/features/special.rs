//! New Year and Christmas window indicator columns.
//!
//! These days are removed from the holiday table during curation and modelled
//! here with one 0/1 column per calendar day instead.

use crate::domain::columns::{COUNTRY, DAY, MONTH, YEAR};
use crate::domain::{Column, Country, FeatureTable};
use crate::error::FeatureError;

const DECEMBER_DAYS: std::ops::RangeInclusive<i64> = 25..=31;
const JANUARY_DAYS: std::ops::RangeInclusive<i64> = 1..=10;

/// Japan's New Year effect only shows up in the first year of data.
const JAPAN_NEW_YEAR_YEAR: i64 = 2017;

/// Add `day_12_25`..`day_12_31` and `day_1_1`..`day_1_10` to `target`.
///
/// Returns the new column names in creation order.
pub fn special_date_flags(target: &mut FeatureTable) -> Result<Vec<String>, FeatureError> {
    target.require(&[MONTH, DAY, COUNTRY, YEAR])?;

    let (december, january) = {
        let months = target.ints(MONTH)?;
        let days = target.ints(DAY)?;
        let years = target.ints(YEAR)?;
        let is_japan: Vec<bool> = target
            .texts(COUNTRY)?
            .iter()
            .map(|c| Country::from_name(c) == Some(Country::Japan))
            .collect();

        let december: Vec<(String, Vec<f64>)> = DECEMBER_DAYS
            .map(|day| {
                let flags = (0..months.len())
                    .map(|i| flag(months[i] == 12 && days[i] == day && !is_japan[i]))
                    .collect();
                (format!("day_12_{day}"), flags)
            })
            .collect();

        let january: Vec<(String, Vec<f64>)> = JANUARY_DAYS
            .map(|day| {
                let flags = (0..months.len())
                    .map(|i| {
                        flag(months[i] == 1
                            && days[i] == day
                            && (years[i] == JAPAN_NEW_YEAR_YEAR || !is_japan[i]))
                    })
                    .collect();
                (format!("day_1_{day}"), flags)
            })
            .collect();

        (december, january)
    };

    let mut names = Vec::with_capacity(december.len() + january.len());
    for (name, flags) in december.into_iter().chain(january) {
        target.insert(name.clone(), Column::Float(flags))?;
        names.push(name);
    }
    Ok(names)
}

fn flag(on: bool) -> f64 {
    if on { 1.0 } else { 0.0 }
}
