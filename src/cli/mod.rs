//! Command-line parsing for the calendar feature tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the feature code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Country, DEFAULT_CUSTOM_COLUMN, DEFAULT_YEARS};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "calfeat", version, about = "Calendar and holiday features for sales forecasting")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the holiday influence kernel.
    Kernel,
    /// Enumerate and curate holidays, print them, and optionally export JSON.
    Holidays(HolidayArgs),
    /// Add calendar features to a sales CSV and optionally export the result.
    Features(FeatureArgs),
    /// Look up GDP per capita for a country and year.
    Gdp(GdpArgs),
    /// Launch the interactive sales dashboard.
    Dashboard(DashboardArgs),
}

/// Holiday calendar configuration shared by `holidays` and `features`.
#[derive(Debug, Args, Clone)]
pub struct CalendarArgs {
    /// Years to enumerate holidays for (comma separated).
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_YEARS)]
    pub years: Vec<i32>,

    /// Countries to enumerate holidays for (default: all five).
    #[arg(short = 'c', long = "country", value_enum)]
    pub countries: Vec<Country>,

    /// Read raw holidays from a `date,country[,name]` CSV instead of the holiday API.
    #[arg(long, value_name = "CSV")]
    pub holidays_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct HolidayArgs {
    #[command(flatten)]
    pub calendar: CalendarArgs,

    /// Export the curated holiday table to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct FeatureArgs {
    /// Sales CSV (prompts for one under `--data-dir` when omitted).
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Directory searched by the interactive picker.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub calendar: CalendarArgs,

    /// Countries receiving the custom post-Christmas decay column.
    #[arg(long = "custom-country", value_enum, default_values_t = [Country::Canada, Country::Estonia])]
    pub custom_countries: Vec<Country>,

    /// Name of the custom decay column.
    #[arg(long, default_value = DEFAULT_CUSTOM_COLUMN)]
    pub custom_column: String,

    /// Skip the New Year / Christmas indicator columns.
    #[arg(long)]
    pub no_special_dates: bool,

    /// Add a `gdp` column from the World Bank API.
    #[arg(long)]
    pub gdp: bool,

    /// Export the augmented table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the curated holiday table to JSON.
    #[arg(long = "export-holidays", value_name = "JSON")]
    pub export_holidays: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct GdpArgs {
    #[arg(short = 'c', long, value_enum)]
    pub country: Country,

    #[arg(short = 'y', long)]
    pub year: i32,
}

#[derive(Debug, Args, Clone)]
pub struct DashboardArgs {
    /// Directory holding the dataset CSVs.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Value column summed per category.
    #[arg(long, default_value = "num_sold")]
    pub value: String,

    /// Divide each row's value by this numeric column first (e.g. `gdp`).
    #[arg(long)]
    pub adjust: Option<String>,
}
