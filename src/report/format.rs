//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the feature code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::FeatureRun;
use crate::domain::{Country, FeatureConfig, HolidayTable};
use crate::features::InfluenceKernel;
use crate::io::ingest::RowError;

const BAR_WIDTH: usize = 40;

/// Kernel weights with a small bar per offset.
pub fn format_kernel(kernel: &InfluenceKernel) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>6} {:>10}\n", "offset", "weight"));
    out.push_str(&format!("{:->6} {:->10}\n", "", ""));
    for (offset, weight) in kernel.iter() {
        let bar = "#".repeat((weight.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize);
        out.push_str(format!("{offset:>6} {weight:>10.6} {bar}").trim_end());
        out.push('\n');
    }
    out
}

/// Per-country counts followed by every curated holiday.
pub fn format_holiday_table(table: &HolidayTable, countries: &[Country]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Curated holidays: {}\n", table.len()));
    for &country in countries {
        out.push_str(&format!("  {:<10} {:>4}\n", country.name(), table.count_for(country)));
    }
    out.push('\n');
    out.push_str(&format!("{:<10} {:<10}\n", "date", "country"));
    out.push_str(&format!("{:-<10} {:-<10}\n", "", ""));
    for record in table.iter() {
        out.push_str(&format!("{} {}\n", record.date, record.country));
    }
    out
}

/// Summary of a `features` run: input stats, holidays used, columns added.
pub fn format_feature_summary(run: &FeatureRun, config: &FeatureConfig) -> String {
    let mut out = String::new();

    out.push_str("=== calfeat - calendar features ===\n");
    out.push_str(&format!("Input: {}\n", run.ingest.path.display()));
    out.push_str(&format!(
        "Rows: used={} read={} skipped={}\n",
        run.ingest.rows_used,
        run.ingest.rows_read,
        run.ingest.row_errors.len()
    ));
    out.push_str(&format!("Years: {}\n", fmt_list(&config.years)));
    out.push_str(&format!(
        "Holidays: {} curated across {} countries\n",
        run.holidays.len(),
        config.countries.len()
    ));

    out.push_str("\nFeature columns:\n");
    let table = &run.ingest.table;
    for name in &run.feature_columns {
        let Ok(values) = table.floats(name) else { continue };
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let nonzero = finite.iter().filter(|v| **v != 0.0).count();
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        out.push_str(&format!(
            "  {:<14} nonzero={:>7} max={}\n",
            name,
            nonzero,
            if max.is_finite() { format!("{max:.4}") } else { "-".to_string() }
        ));
    }

    if !run.ingest.row_errors.is_empty() {
        out.push('\n');
        out.push_str(&format_row_errors(&run.ingest.row_errors, 10));
    }

    out
}

/// First `max` row errors, plus a count of the rest.
pub fn format_row_errors(errors: &[RowError], max: usize) -> String {
    let mut out = String::from("Skipped rows:\n");
    for e in errors.iter().take(max) {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    if errors.len() > max {
        out.push_str(&format!("  ... and {} more\n", errors.len() - max));
    }
    out
}

fn fmt_list(v: &[i32]) -> String {
    let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    parts.join(", ")
}
