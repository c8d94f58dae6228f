//! Shared feature pipeline used by the CLI and the dashboard.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> holidays -> time expansion -> holiday merge -> flags -> custom decay -> GDP
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use std::collections::BTreeSet;

use tracing::info;

use crate::data::{CsvHolidaySource, NagerClient, WorldBankClient, build_holiday_table};
use crate::domain::columns::{GDP, HOLIDAY, YEAR};
use crate::domain::{FeatureConfig, HolidaySourceSpec, HolidayTable};
use crate::error::AppError;
use crate::features::{
    add_holiday_column, attach_gdp, custom_holiday_feature, expand_time, influence_kernel,
    special_date_flags,
};
use crate::io::ingest::{IngestedTable, load_sales_table};

/// All computed outputs of a single `calfeat features` run.
#[derive(Debug, Clone)]
pub struct FeatureRun {
    /// Ingested table, augmented in place with the feature columns.
    pub ingest: IngestedTable,
    pub holidays: HolidayTable,
    /// Model input columns in creation order.
    pub feature_columns: Vec<String>,
}

/// Enumerate and curate holidays from the configured source.
pub fn build_holidays(config: &FeatureConfig) -> Result<HolidayTable, AppError> {
    match &config.source {
        HolidaySourceSpec::Api => {
            build_holiday_table(&NagerClient::from_env(), &config.years, &config.countries)
        }
        HolidaySourceSpec::File(path) => {
            let source = CsvHolidaySource::load(path)?;
            build_holiday_table(&source, &config.years, &config.countries)
        }
    }
}

/// Execute the full feature pipeline and return the computed outputs.
pub fn run_features(config: &FeatureConfig) -> Result<FeatureRun, AppError> {
    let Some(path) = config.sales_path.as_deref() else {
        return Err(AppError::new(2, "No sales CSV given. Use `calfeat features -f <file.csv>`."));
    };

    // 1) Load the sales table.
    let ingest = load_sales_table(path)?;

    // 2) Enumerate and curate holidays.
    let holidays = build_holidays(config)?;

    run_features_with_holidays(config, ingest, holidays)
}

/// Execute the feature steps with a pre-built holiday table.
///
/// This is useful when the same holidays are applied to several tables
/// (train, test, predictions).
pub fn run_features_with_holidays(
    config: &FeatureConfig,
    mut ingest: IngestedTable,
    holidays: HolidayTable,
) -> Result<FeatureRun, AppError> {
    let kernel = influence_kernel();
    let table = &mut ingest.table;

    // 3) Date-derived columns; everything below keys on them.
    let mut feature_columns = expand_time(table)?;

    // 4) Kernel-smoothed holiday column.
    add_holiday_column(table, &holidays, &kernel)?;
    feature_columns.push(HOLIDAY.to_string());

    // 5) New Year / Christmas indicators.
    if config.special_dates {
        feature_columns.extend(special_date_flags(table)?);
    }

    // 6) Custom post-Christmas decay.
    if !config.custom_countries.is_empty() {
        custom_holiday_feature(table, &config.custom_countries, &config.custom_column, &kernel)?;
        feature_columns.push(config.custom_column.clone());
    }

    // 7) GDP per capita for the years present in the table.
    if config.gdp {
        let years: Vec<i32> = table
            .ints(YEAR)?
            .iter()
            .filter_map(|&y| i32::try_from(y).ok())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let lookup = WorldBankClient::from_env().gdp_lookup(&config.countries, &years)?;
        attach_gdp(table, &lookup)?;
        feature_columns.push(GDP.to_string());
    }

    info!(
        rows = table.len(),
        holidays = holidays.len(),
        features = feature_columns.len(),
        "features built"
    );

    // 8) Optional exports.
    if let Some(path) = &config.export_features {
        crate::io::export::write_feature_csv(path, table)?;
        info!(path = %path.display(), "wrote feature table");
    }
    if let Some(path) = &config.export_holidays {
        crate::io::holidays::write_holiday_json(path, &holidays, &config.years, &config.countries)?;
        info!(path = %path.display(), "wrote holiday table");
    }

    Ok(FeatureRun {
        ingest,
        holidays,
        feature_columns,
    })
}
