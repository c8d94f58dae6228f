//! Holiday sources.
//!
//! A source enumerates the holidays of one country in one year. The core only
//! uses the dates; labels are kept for display.
//!
//! Two sources are provided:
//! - [`NagerClient`]: the public Nager.Date holiday API (nationwide entries only)
//! - [`CsvHolidaySource`]: a flat `date,country[,name]` file

use std::fs::File;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{Country, HolidayRecord, HolidayTable};
use crate::error::AppError;
use crate::features::curate;
use crate::io::ingest::{build_header_map, parse_date};

const DEFAULT_BASE_URL: &str = "https://date.nager.at/api/v3";

/// Enumerates `(date, label)` holidays for a country and year.
pub trait HolidaySource {
    fn enumerate(&self, country: Country, year: i32) -> Result<Vec<(NaiveDate, String)>, AppError>;
}

/// Enumerate `years` × `countries` (years outer), each country-year sorted by date.
pub fn collect_raw_holidays<S: HolidaySource>(
    source: &S,
    years: &[i32],
    countries: &[Country],
) -> Result<Vec<HolidayRecord>, AppError> {
    let mut out = Vec::new();
    for &year in years {
        for &country in countries {
            let mut holidays = source.enumerate(country, year)?;
            holidays.sort_by_key(|(date, _)| *date);
            debug!(%country, year, n = holidays.len(), "enumerated holidays");
            out.extend(
                holidays
                    .into_iter()
                    .map(|(date, _)| HolidayRecord::new(date, country)),
            );
        }
    }
    Ok(out)
}

/// Enumerate and curate in one step.
pub fn build_holiday_table<S: HolidaySource>(
    source: &S,
    years: &[i32],
    countries: &[Country],
) -> Result<HolidayTable, AppError> {
    let raw = collect_raw_holidays(source, years, countries)?;
    let table = curate(&raw, years, countries);
    info!(raw = raw.len(), curated = table.len(), "built holiday table");
    Ok(table)
}

pub struct NagerClient {
    client: Client,
    base_url: String,
}

impl NagerClient {
    /// Build a client; `HOLIDAY_API_URL` overrides the default endpoint.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("HOLIDAY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl HolidaySource for NagerClient {
    fn enumerate(&self, country: Country, year: i32) -> Result<Vec<(NaiveDate, String)>, AppError> {
        let url = format!("{}/PublicHolidays/{year}/{}", self.base_url, country.alpha2());
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::new(4, format!("Holiday request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Holiday request for {country} {year} failed with status {}.", resp.status()),
            ));
        }

        let body: Vec<PublicHoliday> = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse holiday response: {e}")))?;

        parse_public_holidays(body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicHoliday {
    date: String,
    name: String,
    #[serde(default = "default_global")]
    global: bool,
}

fn default_global() -> bool {
    true
}

fn parse_public_holidays(body: Vec<PublicHoliday>) -> Result<Vec<(NaiveDate, String)>, AppError> {
    let mut out = Vec::with_capacity(body.len());
    for h in body.into_iter().filter(|h| h.global) {
        let date = NaiveDate::parse_from_str(&h.date, "%Y-%m-%d")
            .map_err(|e| AppError::new(4, format!("Invalid holiday date '{}': {e}", h.date)))?;
        out.push((date, h.name));
    }
    Ok(out)
}

/// Holidays loaded from a CSV file with `date`, `country` and optional `name`.
#[derive(Debug, Clone, Default)]
pub struct CsvHolidaySource {
    entries: Vec<(HolidayRecord, String)>,
}

impl CsvHolidaySource {
    pub fn from_entries(entries: Vec<(HolidayRecord, String)>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(2, format!("Failed to open holiday CSV '{}': {e}", path.display()))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| AppError::new(2, format!("Failed to read holiday CSV headers: {e}")))?
            .clone();
        let header_map = build_header_map(&headers);

        let (Some(&date_idx), Some(&country_idx)) = (header_map.get("date"), header_map.get("country")) else {
            return Err(AppError::new(2, "Holiday CSV requires `date` and `country` columns."));
        };
        let name_idx = header_map.get("name").copied();

        let mut entries = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let line = idx + 2;
            let record = result
                .map_err(|e| AppError::new(2, format!("Holiday CSV parse error on line {line}: {e}")))?;

            let date = parse_date(record.get(date_idx).unwrap_or(""))
                .map_err(|e| AppError::new(2, format!("Holiday CSV line {line}: {e}")))?;
            let country: Country = record
                .get(country_idx)
                .unwrap_or("")
                .parse()
                .map_err(|e| AppError::new(2, format!("Holiday CSV line {line}: {e}")))?;
            let name = name_idx
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string();

            entries.push((HolidayRecord::new(date, country), name));
        }

        info!(path = %path.display(), n = entries.len(), "loaded holiday file");
        Ok(Self { entries })
    }
}

impl HolidaySource for CsvHolidaySource {
    fn enumerate(&self, country: Country, year: i32) -> Result<Vec<(NaiveDate, String)>, AppError> {
        Ok(self
            .entries
            .iter()
            .filter(|(r, _)| r.country == country && r.date.year() == year)
            .map(|(r, name)| (r.date, name.clone()))
            .collect())
    }
}
