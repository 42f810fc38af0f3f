//! Reader for native spreadsheet files via calamine. The first row of the
//! first sheet is taken as the header; merged-cell headers are not present
//! in these exports.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::domain::{Cell, ColumnLabel, Table};
use crate::error::{CleanError, Result};

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::from_raw(s),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::Text(naive.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Null,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_raw(s),
        Data::Error(_) => Cell::Null,
    }
}

pub fn read_excel(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let name = path.display().to_string();

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CleanError::EmptyTable(name.clone()))??;

    let mut rows = range.rows();
    let labels: Vec<ColumnLabel> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|d| ColumnLabel::single(to_cell(d).render()))
            .collect(),
        None => return Err(CleanError::EmptyTable(name)),
    };

    let data = rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    Ok(Table::new(labels, data))
}
