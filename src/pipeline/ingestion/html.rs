//! Reader for the legacy `.xls` exports, which are actually HTML documents
//! containing a single `<table>`. Cross-tabulated exports use two header
//! rows with colspans; those become multi-level column labels.

use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;

use crate::domain::{Cell, ColumnLabel, Table};
use crate::error::{CleanError, Result};

struct RawRow {
    cells: Vec<(String, usize)>, // text, colspan
    is_header: bool,
}

fn cell_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

fn colspan(element: ElementRef) -> usize {
    element
        .value()
        .attr("colspan")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

fn collect_rows(html: &Html) -> Vec<RawRow> {
    let table_sel = Selector::parse("table").unwrap();
    let tr_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();
    let th_sel = Selector::parse("th").unwrap();

    let Some(table) = html.select(&table_sel).next() else {
        return Vec::new();
    };

    table
        .select(&tr_sel)
        .map(|tr| {
            let is_header = tr.select(&th_sel).next().is_some();
            let cells = tr
                .select(&cell_sel)
                .map(|c| (cell_text(c), colspan(c)))
                .collect();
            RawRow { cells, is_header }
        })
        .filter(|row| !row.cells.is_empty())
        .collect()
}

/// Expand colspans into one entry per column slot.
fn expand(cells: &[(String, usize)]) -> Vec<String> {
    let mut out = Vec::new();
    for (text, span) in cells {
        for _ in 0..*span {
            out.push(text.clone());
        }
    }
    out
}

/// Parse the first `<table>` of an HTML document into a `Table`.
pub fn parse_html_table(content: &str, source_name: &str) -> Result<Table> {
    let html = Html::parse_document(content);
    let rows = collect_rows(&html);
    if rows.is_empty() {
        return Err(CleanError::EmptyTable(source_name.to_string()));
    }

    // Leading run of header rows; a table with no <th> at all treats its
    // first row as the header
    let header_count = rows.iter().take_while(|r| r.is_header).count().max(1);
    let header_rows: Vec<Vec<String>> = rows[..header_count.min(rows.len())]
        .iter()
        .map(|r| expand(&r.cells))
        .collect();

    let width = header_rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let labels: Vec<ColumnLabel> = (0..width)
        .map(|col| {
            let levels: Vec<String> = header_rows
                .iter()
                .map(|row| row.get(col).cloned().unwrap_or_default())
                .filter(|level| !level.is_empty())
                .collect();
            match levels.len() {
                0 => ColumnLabel::single(""),
                1 => ColumnLabel::single(levels.into_iter().next().unwrap()),
                _ => ColumnLabel::multi(levels),
            }
        })
        .collect();

    let data = rows[header_count.min(rows.len())..]
        .iter()
        .map(|row| {
            expand(&row.cells)
                .into_iter()
                .map(|text| Cell::from_raw(&text))
                .collect()
        })
        .collect();

    Ok(Table::new(labels, data))
}

/// Read an `.xls`-as-HTML file from disk.
pub fn read_html_table(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path)?;
    let name = path.display().to_string();
    parse_html_table(&content, &name)
}
