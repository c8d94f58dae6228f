//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the holiday table and feature columns
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{CalendarArgs, Command, DashboardArgs, FeatureArgs, GdpArgs, HolidayArgs};
use crate::data::WorldBankClient;
use crate::domain::{Country, FeatureConfig, HolidaySourceSpec};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `calfeat` binary.
pub fn run() -> Result<(), AppError> {
    // We want `calfeat` and `calfeat --data-dir d` to behave like
    // `calfeat dashboard ...`. Clap requires a subcommand name, so argv is
    // rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The dashboard owns the terminal; only errors may reach stderr.
    let level = match cli.command {
        Command::Dashboard(_) => "error",
        _ => crate::logging::level_for(cli.verbose),
    };
    crate::logging::init_tracing(level);

    match cli.command {
        Command::Kernel => handle_kernel(),
        Command::Holidays(args) => handle_holidays(args),
        Command::Features(args) => handle_features(args),
        Command::Gdp(args) => handle_gdp(args),
        Command::Dashboard(args) => handle_dashboard(args),
    }
}

fn handle_kernel() -> Result<(), AppError> {
    let kernel = crate::features::influence_kernel();
    println!("{}", crate::report::format_kernel(&kernel));
    Ok(())
}

fn handle_holidays(args: HolidayArgs) -> Result<(), AppError> {
    let config = calendar_config(&args.calendar);
    let table = pipeline::build_holidays(&config)?;

    println!("{}", crate::report::format_holiday_table(&table, &config.countries));

    if let Some(path) = &args.export_json {
        crate::io::holidays::write_holiday_json(path, &table, &config.years, &config.countries)?;
    }
    Ok(())
}

fn handle_features(args: FeatureArgs) -> Result<(), AppError> {
    let path = match &args.file {
        Some(path) => crate::cli::picker::validate_csv_path(path)?,
        None => crate::cli::picker::prompt_for_csv_path(&args.data_dir)?,
    };
    let config = FeatureConfig {
        sales_path: Some(path),
        ..feature_config_from_args(&args)
    };

    let run = pipeline::run_features(&config)?;
    println!("{}", crate::report::format_feature_summary(&run, &config));
    Ok(())
}

fn handle_gdp(args: GdpArgs) -> Result<(), AppError> {
    let client = WorldBankClient::from_env();
    match client.gdp_per_capita(args.country, args.year)? {
        Some(value) => println!("{} {}: {value:.2} US$", args.country, args.year),
        None => println!("{} {}: no value", args.country, args.year),
    }
    Ok(())
}

fn handle_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

/// Holiday calendar part of the configuration (years, countries, source).
fn calendar_config(args: &CalendarArgs) -> FeatureConfig {
    let countries = if args.countries.is_empty() {
        Country::ALL.to_vec()
    } else {
        args.countries.clone()
    };
    let source = match &args.holidays_csv {
        Some(path) => HolidaySourceSpec::File(path.clone()),
        None => HolidaySourceSpec::Api,
    };

    FeatureConfig {
        years: args.years.clone(),
        countries,
        source,
        ..FeatureConfig::default()
    }
}

pub fn feature_config_from_args(args: &FeatureArgs) -> FeatureConfig {
    FeatureConfig {
        sales_path: args.file.clone(),
        custom_countries: args.custom_countries.clone(),
        custom_column: args.custom_column.clone(),
        special_dates: !args.no_special_dates,
        gdp: args.gdp,
        export_features: args.export.clone(),
        export_holidays: args.export_holidays.clone(),
        ..calendar_config(&args.calendar)
    }
}

/// Rewrite argv so `calfeat` defaults to `calfeat dashboard`.
///
/// Rules:
/// - `calfeat`                       -> `calfeat dashboard`
/// - `calfeat --data-dir d ...`      -> `calfeat dashboard --data-dir d ...`
/// - `calfeat --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("dashboard".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "kernel" | "holidays" | "features" | "gdp" | "dashboard"
    );
    if is_subcommand {
        return argv;
    }

    // Verbosity flags are global; anything else is a dashboard flag.
    if arg1.starts_with('-') && !matches!(arg1.as_str(), "-v" | "-vv" | "--verbose") {
        argv.insert(1, "dashboard".to_string());
        return argv;
    }

    argv
}
