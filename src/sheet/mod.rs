//! Test case intake from spreadsheets
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods`) are read with calamine from a
//! named sheet; `.csv` files are read with the csv crate. Both go through the
//! same header validation in [`parse_rows`].

mod readers;

use crate::analysis::TestCase;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const COLUMN_ID: &str = "Test Case ID";
pub const COLUMN_DESCRIPTION: &str = "Test Description";
pub const COLUMN_STEPS: &str = "Steps";
pub const COLUMN_EXPECTED: &str = "Expected Result";
pub const COLUMN_ACTUAL: &str = "Actual Result";

/// Columns every input sheet must provide
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COLUMN_ID,
    COLUMN_DESCRIPTION,
    COLUMN_STEPS,
    COLUMN_EXPECTED,
    COLUMN_ACTUAL,
];

/// Default worksheet name for workbook inputs
pub const DEFAULT_SHEET: &str = "Sheet1";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Unsupported input format: {0} (expected .xlsx, .xlsm, .xls, .xlsb, .ods or .csv)")]
    UnsupportedFormat(String),

    #[error("Sheet '{sheet}' not found. Available sheets: {}", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Input has no header row")]
    MissingHeader,

    #[error("Input must contain columns: {}. Missing: {}", REQUIRED_COLUMNS.join(", "), missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, SheetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(InputFormat::Workbook),
            "csv" => Ok(InputFormat::Csv),
            _ => Err(SheetError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Reads all test cases from `path`. `sheet` applies to workbook inputs only.
pub fn read_test_cases(path: &Path, sheet: &str) -> Result<Vec<TestCase>, SheetError> {
    let format = InputFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "Reading test cases");

    let rows = match format {
        InputFormat::Workbook => readers::read_workbook_rows(path, sheet)?,
        InputFormat::Csv => readers::read_csv_rows(path)?,
    };

    let cases = parse_rows(rows)?;
    info!(path = %path.display(), cases = cases.len(), "Loaded test cases");
    Ok(cases)
}

/// Validates the header row and converts the remaining rows into test cases.
///
/// Rows whose cells are all blank are skipped. Missing trailing cells are
/// treated as empty.
pub fn parse_rows(rows: Vec<Vec<String>>) -> Result<Vec<TestCase>, SheetError> {
    let mut rows = rows.into_iter();
    let header = rows.next().ok_or(SheetError::MissingHeader)?;
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !header.iter().any(|h| h == *column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SheetError::MissingColumns { missing });
    }

    let index = |column: &str| header.iter().position(|h| h == column).unwrap_or(0);
    let (id, description, steps, expected, actual) = (
        index(COLUMN_ID),
        index(COLUMN_DESCRIPTION),
        index(COLUMN_STEPS),
        index(COLUMN_EXPECTED),
        index(COLUMN_ACTUAL),
    );

    let cases = rows
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            let cell = |i: usize| row.get(i).map(|c| c.trim()).unwrap_or_default();
            TestCase::from_cells(
                cell(id),
                cell(description),
                cell(steps),
                cell(expected),
                cell(actual),
            )
        })
        .collect();

    Ok(cases)
}
