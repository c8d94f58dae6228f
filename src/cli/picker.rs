//! Dataset discovery and the interactive CSV picker.
//!
//! Datasets are `*.csv` files under a data directory (e.g. `data/train.csv`,
//! `data/predicted.csv`); a dataset's name is its file stem. The dashboard
//! lists them, and `calfeat features` without `-f` prompts for one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory recursion depth when looking for datasets.
const DEFAULT_SEARCH_DEPTH: usize = 2;

/// Prompt the user to select a CSV file from `dir`.
///
/// Accepts either a number from the list or an explicit path; `q` cancels.
pub fn prompt_for_csv_path(dir: &Path) -> Result<PathBuf, AppError> {
    let files = discover_datasets(dir);
    if files.is_empty() {
        return Err(AppError::new(
            2,
            format!(
                "No .csv files found under '{}'. Provide one with `calfeat features -f <file.csv>`.",
                dir.display()
            ),
        ));
    }

    println!("Found {} dataset(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    loop {
        print!("Select a dataset by number (1-{}) or type a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a CSV path with `calfeat features -f <file.csv>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_csv_path(&files[choice - 1]);
            }
            println!("Invalid choice: {choice}. Enter a number between 1 and {}.", files.len());
            continue;
        }

        match validate_csv_path(Path::new(input)) {
            Ok(path) => return Ok(path),
            Err(err) => println!("{err}"),
        }
    }
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !is_csv(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}).", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// `*.csv` files under `dir`, sorted by path.
pub fn discover_datasets(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_csv_files(dir, 0, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

/// Display name of a dataset: its file stem.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("?")
        .to_string()
}

fn find_csv_files(root: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > DEFAULT_SEARCH_DEPTH {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_csv_files(&path, depth + 1, out);
            }
        } else if file_type.is_file() && is_csv(&path) {
            out.push(path);
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
