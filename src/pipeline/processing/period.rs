//! Academic-period normalization. Periods are the time axis for every
//! downstream join, so malformed values are flagged but never dropped.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::domain::{Cell, Table};

/// Canonical shape of an academic period: `YYYY-S`, S in {1,2}.
pub static PERIOD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-[12]$").unwrap());

static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s/]+").unwrap());

/// Name given to the derived calendar-date column.
pub const DATE_COLUMN: &str = "fecha";

/// Default name of the period column.
pub const PERIOD_COLUMN: &str = "periodo";

/// Locate the period column: exact `periodo` first, then the first label
/// containing it.
pub fn find_period_column(table: &Table) -> Option<usize> {
    table
        .column_index(PERIOD_COLUMN)
        .or_else(|| table.find_column_containing(PERIOD_COLUMN))
}

/// Normalize every value in the period column in place: cast to string,
/// trim, collapse runs of whitespace or `/` into `-`, then validate against
/// `YYYY-S`. Returns the distinct invalid values found. Invalid values stay
/// in the table; missing cells are left missing.
pub fn normalize_periods(table: &mut Table, col: usize) -> Vec<String> {
    let mut invalid: Vec<String> = Vec::new();

    for row in 0..table.n_rows() {
        let raw = match table.cell(row, col) {
            Cell::Null => continue,
            other => other.render(),
        };
        let normalized = SEPARATOR_RUNS.replace_all(raw.trim(), "-").to_string();
        if !PERIOD_PATTERN.is_match(&normalized) && !invalid.contains(&normalized) {
            invalid.push(normalized.clone());
        }
        table.set_cell(row, col, Cell::Text(normalized));
    }

    if !invalid.is_empty() {
        warn!(column = col, invalid = ?invalid, "invalid academic periods found");
    }
    invalid
}

/// Map a normalized period to the first day of its semester:
/// `2018-1` -> `2018-01-01`, `2018-2` -> `2018-07-01`.
pub fn period_to_date(period: &str) -> Option<NaiveDate> {
    if !PERIOD_PATTERN.is_match(period) {
        return None;
    }
    let (year, semester) = period.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month = if semester == "1" { 1 } else { 7 };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Append a `fecha` column derived from the period column. Unparseable
/// periods yield a missing date instead of failing the table.
pub fn derive_date_column(table: &mut Table, period_col: usize) {
    let dates: Vec<Cell> = table
        .column_cells(period_col)
        .map(|cell| match cell {
            Cell::Text(s) => match period_to_date(s) {
                Some(date) => Cell::Text(date.format("%Y-%m-%d").to_string()),
                None => Cell::Null,
            },
            _ => Cell::Null,
        })
        .collect();
    table.push_column(DATE_COLUMN, dates);
}
