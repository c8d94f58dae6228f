//! World Bank API integration for GDP per capita.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::Country;
use crate::error::AppError;
use crate::features::GdpLookup;

const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";
const GDP_PER_CAPITA: &str = "NY.GDP.PCAP.CD";

pub struct WorldBankClient {
    client: Client,
    base_url: String,
}

impl WorldBankClient {
    /// Build a client; `WORLDBANK_API_URL` overrides the default endpoint.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("WORLDBANK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GDP per capita in current US$ for one country and year.
    ///
    /// `Ok(None)` when the API knows the series but has no value for the year.
    pub fn gdp_per_capita(&self, country: Country, year: i32) -> Result<Option<f64>, AppError> {
        let url = format!(
            "{}/country/{}/indicator/{GDP_PER_CAPITA}",
            self.base_url,
            country.alpha3()
        );
        let resp = self
            .client
            .get(&url)
            .query(&[("date", year.to_string()), ("format", "json".to_string())])
            .send()
            .map_err(|e| AppError::new(4, format!("World Bank request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("World Bank request failed with status {}.", resp.status()),
            ));
        }

        let body: serde_json::Value = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse World Bank response: {e}")))?;

        let value = parse_indicator_value(body)?;
        debug!(%country, year, ?value, "gdp per capita");
        Ok(value)
    }

    /// Fetch every `(country, year)` pair into a lookup table.
    pub fn gdp_lookup(&self, countries: &[Country], years: &[i32]) -> Result<GdpLookup, AppError> {
        let mut out = GdpLookup::new();
        for &country in countries {
            for &year in years {
                if let Some(value) = self.gdp_per_capita(country, year)? {
                    out.insert((country, year), value);
                }
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct IndicatorEntry {
    value: Option<f64>,
}

/// The API answers `[page_info, [entries...]]`; the first entry holds the value.
fn parse_indicator_value(body: serde_json::Value) -> Result<Option<f64>, AppError> {
    let (_, entries): (serde_json::Value, Option<Vec<IndicatorEntry>>) = serde_json::from_value(body)
        .map_err(|e| AppError::new(4, format!("Unexpected World Bank payload: {e}")))?;

    Ok(entries
        .and_then(|e| e.into_iter().next())
        .and_then(|e| e.value)
        .filter(|v| v.is_finite()))
}
