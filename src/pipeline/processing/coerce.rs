//! Best-effort type coercion. After this pass every column is either fully
//! numeric or fully textual; no mixed per-cell typing leaks downstream.

use crate::domain::{Cell, Table};

/// Strip thousands-separator commas and try to parse a number.
fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Coerce every column: a column becomes numeric only when all of its
/// non-missing values parse as numbers (after comma stripping); otherwise
/// every cell is kept as a trimmed string. Never fails on unparseable input.
pub fn coerce_types(table: &mut Table) {
    for col in 0..table.n_cols() {
        let mut parsed: Vec<Option<f64>> = Vec::with_capacity(table.n_rows());
        let mut all_numeric = true;

        for cell in table.column_cells(col) {
            match cell {
                Cell::Null => parsed.push(None),
                Cell::Number(n) => parsed.push(Some(*n)),
                Cell::Text(s) => match parse_numeric(s) {
                    Some(n) => parsed.push(Some(n)),
                    None => {
                        all_numeric = false;
                        break;
                    }
                },
            }
        }

        if all_numeric {
            for (row, value) in parsed.into_iter().enumerate() {
                let cell = match value {
                    Some(n) => Cell::Number(n),
                    None => Cell::Null,
                };
                table.set_cell(row, col, cell);
            }
        } else {
            // Textual column: trim strings, render stray numbers as text
            for row in 0..table.n_rows() {
                let cell = match table.cell(row, col) {
                    Cell::Text(s) => Cell::Text(s.trim().to_string()),
                    Cell::Number(n) => Cell::Text(Cell::Number(*n).render()),
                    Cell::Null => Cell::Null,
                };
                table.set_cell(row, col, cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnKind, ColumnLabel};

    fn text_column(values: &[&str]) -> Table {
        let rows = values
            .iter()
            .map(|v| vec![Cell::from_raw(v)])
            .collect();
        Table::new(vec![ColumnLabel::single("v")], rows)
    }

    #[test]
    fn test_numeric_column_with_thousands_separators() {
        let mut table = text_column(&["1,234", "56", "7,890,123"]);
        coerce_types(&mut table);

        assert_eq!(table.column_kind(0), ColumnKind::Numeric);
        assert_eq!(table.cell(0, 0), &Cell::Number(1234.0));
        assert_eq!(table.cell(2, 0), &Cell::Number(7890123.0));
    }

    #[test]
    fn test_mixed_column_stays_textual() {
        let mut table = text_column(&["12", "doce", "13"]);
        coerce_types(&mut table);

        assert_eq!(table.column_kind(0), ColumnKind::Text);
        assert_eq!(table.cell(0, 0), &Cell::Text("12".to_string()));
        assert_eq!(table.cell(1, 0), &Cell::Text("doce".to_string()));
    }

    #[test]
    fn test_nulls_survive_numeric_coercion() {
        let mut table = text_column(&["10", "", "30"]);
        coerce_types(&mut table);

        assert_eq!(table.column_kind(0), ColumnKind::Numeric);
        assert!(table.cell(1, 0).is_null());
    }

    #[test]
    fn test_textual_column_values_are_trimmed() {
        let mut table = Table::new(
            vec![ColumnLabel::single("v")],
            vec![
                vec![Cell::Text("  Ensenada  ".to_string())],
                vec![Cell::Number(3.0)],
            ],
        );
        coerce_types(&mut table);

        assert_eq!(table.cell(0, 0), &Cell::Text("Ensenada".to_string()));
        // Stray number in a textual column is rendered as text
        assert_eq!(table.cell(1, 0), &Cell::Text("3".to_string()));
    }

    #[test]
    fn test_never_panics_on_weird_input() {
        let mut table = text_column(&["", "NaN?", "-", "$5"]);
        coerce_types(&mut table);
        assert_eq!(table.column_kind(0), ColumnKind::Text);
    }
}
