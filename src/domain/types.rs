//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during feature computation
//! - exported to JSON/CSV
//! - reused read-only across several target tables

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Column names read or written by the feature code.
pub mod columns {
    pub const DATE: &str = "date";
    pub const COUNTRY: &str = "country";
    pub const DAY: &str = "day";
    pub const WEEK: &str = "week";
    pub const MONTH: &str = "month";
    pub const YEAR: &str = "year";
    pub const DAY_OF_YEAR: &str = "day_of_year";
    pub const TIME_NO: &str = "time_no";
    pub const HOLIDAY: &str = "holiday";
    pub const GDP: &str = "gdp";
    pub const NUM_SOLD: &str = "num_sold";
}

/// Countries present in the sales data.
///
/// The set is closed: every curation rule and every ISO/currency lookup is
/// defined for exactly these five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Country {
    Argentina,
    Canada,
    Estonia,
    Japan,
    Spain,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::Argentina,
        Country::Canada,
        Country::Estonia,
        Country::Japan,
        Country::Spain,
    ];

    /// Name as it appears in the `country` column.
    pub fn name(self) -> &'static str {
        match self {
            Country::Argentina => "Argentina",
            Country::Canada => "Canada",
            Country::Estonia => "Estonia",
            Country::Japan => "Japan",
            Country::Spain => "Spain",
        }
    }

    pub fn alpha2(self) -> &'static str {
        match self {
            Country::Argentina => "AR",
            Country::Canada => "CA",
            Country::Estonia => "EE",
            Country::Japan => "JP",
            Country::Spain => "ES",
        }
    }

    /// ISO 3166-1 alpha-3 code (World Bank country id).
    pub fn alpha3(self) -> &'static str {
        match self {
            Country::Argentina => "ARG",
            Country::Canada => "CAN",
            Country::Estonia => "EST",
            Country::Japan => "JPN",
            Country::Spain => "ESP",
        }
    }

    pub fn currency(self) -> &'static str {
        match self {
            Country::Argentina => "ARS",
            Country::Canada => "CAD",
            Country::Estonia | Country::Spain => "EUR",
            Country::Japan => "JPY",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Country {
    /// Exact match on the name used in the `country` column.
    ///
    /// Table rows are matched with this; `FromStr` is the lenient parse for
    /// user input.
    pub fn from_name(name: &str) -> Option<Country> {
        Country::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl FromStr for Country {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Country::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FeatureError::UnsupportedCountry(trimmed.to_string()))
    }
}

/// One holiday observed in one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub date: NaiveDate,
    pub country: Country,
}

impl HolidayRecord {
    pub fn new(date: NaiveDate, country: Country) -> Self {
        Self { date, country }
    }
}

/// Curated holidays, day resolution.
///
/// Built once per (years, countries) configuration and only read afterwards.
/// Duplicate records are allowed and each one counts separately when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolidayTable {
    records: Vec<HolidayRecord>,
}

impl HolidayTable {
    /// Presence value every record contributes to the merge.
    pub const MARKER: f64 = 1.0;

    pub fn new(records: Vec<HolidayRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HolidayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HolidayRecord> {
        self.records.iter()
    }

    /// Number of records per country (for reporting).
    pub fn count_for(&self, country: Country) -> usize {
        self.records.iter().filter(|r| r.country == country).count()
    }

    /// Distinct years covered by the table, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.date.year()).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// Years covered by the competition sales data.
pub const DEFAULT_YEARS: [i32; 6] = [2017, 2018, 2019, 2020, 2021, 2022];

/// Default countries for the custom post-Christmas decay column.
pub const DEFAULT_CUSTOM_COUNTRIES: [Country; 2] = [Country::Canada, Country::Estonia];

pub const DEFAULT_CUSTOM_COLUMN: &str = "boxing_day";

/// Where raw holidays come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidaySourceSpec {
    /// Public holiday HTTP API.
    Api,
    /// Flat CSV file with `date,country[,name]`.
    File(PathBuf),
}

/// A full run's configuration as understood by the feature pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    pub sales_path: Option<PathBuf>,
    pub years: Vec<i32>,
    pub countries: Vec<Country>,
    pub source: HolidaySourceSpec,

    /// Countries that receive the custom post-Christmas decay column.
    pub custom_countries: Vec<Country>,
    pub custom_column: String,

    pub special_dates: bool,
    pub gdp: bool,

    pub export_features: Option<PathBuf>,
    pub export_holidays: Option<PathBuf>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sales_path: None,
            years: DEFAULT_YEARS.to_vec(),
            countries: Country::ALL.to_vec(),
            source: HolidaySourceSpec::Api,
            custom_countries: DEFAULT_CUSTOM_COUNTRIES.to_vec(),
            custom_column: DEFAULT_CUSTOM_COLUMN.to_string(),
            special_dates: true,
            gdp: false,
            export_features: None,
            export_holidays: None,
        }
    }
}

/// Saved holiday table (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayFile {
    pub tool: String,
    pub years: Vec<i32>,
    pub countries: Vec<Country>,
    pub holidays: Vec<HolidayRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_parses_case_insensitively() {
        assert_eq!("canada".parse::<Country>().unwrap(), Country::Canada);
        assert_eq!(" Spain ".parse::<Country>().unwrap(), Country::Spain);
    }

    #[test]
    fn column_names_match_exactly() {
        assert_eq!(Country::from_name("Japan"), Some(Country::Japan));
        assert_eq!(Country::from_name("japan"), None);
        assert_eq!(Country::from_name("Japan "), None);
    }

    #[test]
    fn unknown_country_is_a_configuration_error() {
        let err = "France".parse::<Country>().unwrap_err();
        assert_eq!(err, FeatureError::UnsupportedCountry("France".to_string()));
    }

    #[test]
    fn country_codes_are_consistent() {
        for country in Country::ALL {
            assert_eq!(country.alpha2().len(), 2);
            assert_eq!(country.alpha3().len(), 3);
            assert_eq!(country.currency().len(), 3);
        }
        assert_eq!(Country::Estonia.currency(), Country::Spain.currency());
    }

    #[test]
    fn holiday_table_years_are_distinct_and_sorted() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let table = HolidayTable::new(vec![
            HolidayRecord::new(d(2019, 5, 1), Country::Spain),
            HolidayRecord::new(d(2017, 1, 6), Country::Spain),
            HolidayRecord::new(d(2019, 5, 1), Country::Spain),
        ]);
        assert_eq!(table.years(), vec![2017, 2019]);
        assert_eq!(table.count_for(Country::Spain), 3);
        assert_eq!(table.count_for(Country::Japan), 0);
    }
}
