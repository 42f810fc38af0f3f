//! CSV reader. Cleaned files are written back out with a BOM, so strip one
//! on the way in too.

use std::fs;
use std::path::Path;

use crate::domain::{Cell, ColumnLabel, Table};
use crate::error::{CleanError, Result};

pub fn read_csv(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let labels: Vec<ColumnLabel> = reader
        .headers()?
        .iter()
        .map(ColumnLabel::single)
        .collect();
    if labels.is_empty() {
        return Err(CleanError::EmptyTable(path.display().to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_raw).collect());
    }

    Ok(Table::new(labels, rows))
}
