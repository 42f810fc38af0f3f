//! Range validation for numeric columns. The policy is picked by the
//! dataset router, not here.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{Cell, Table};

/// What to do with out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangePolicy {
    /// Report the offending values, leave the table unchanged.
    Warn,
    /// Drop the whole row. A single invalid metric invalidates the
    /// observation in this domain.
    Remove,
    /// Replace with the nearest bound; row count never changes.
    Clamp,
}

/// Result of one range validation pass over one column.
#[derive(Debug, Clone, Default)]
pub struct RangeOutcome {
    pub out_of_range: usize,
    pub offending_values: Vec<f64>,
    pub rows_removed: usize,
    pub values_clamped: usize,
}

/// Validate one numeric column against `[min, max]`. Missing cells and
/// textual cells are never flagged.
pub fn validate_range(
    table: &mut Table,
    col: usize,
    min: Option<f64>,
    max: Option<f64>,
    policy: RangePolicy,
) -> RangeOutcome {
    let mut outcome = RangeOutcome::default();

    let mask: Vec<bool> = table
        .column_cells(col)
        .map(|cell| match cell.as_number() {
            Some(n) => min.is_some_and(|m| n < m) || max.is_some_and(|m| n > m),
            None => false,
        })
        .collect();

    outcome.out_of_range = mask.iter().filter(|m| **m).count();
    if outcome.out_of_range == 0 {
        return outcome;
    }

    outcome.offending_values = table
        .column_cells(col)
        .zip(&mask)
        .filter(|(_, flagged)| **flagged)
        .filter_map(|(cell, _)| cell.as_number())
        .collect();

    let column_name = table.label_names()[col].clone();
    match policy {
        RangePolicy::Warn => {
            warn!(
                column = %column_name,
                count = outcome.out_of_range,
                values = ?outcome.offending_values,
                "values out of range"
            );
        }
        RangePolicy::Remove => {
            let keep: Vec<bool> = mask.iter().map(|flagged| !flagged).collect();
            outcome.rows_removed = table.retain_rows(&keep);
            info!(
                column = %column_name,
                rows = outcome.rows_removed,
                "removed rows with out-of-range values"
            );
        }
        RangePolicy::Clamp => {
            for (row, flagged) in mask.iter().enumerate() {
                if !flagged {
                    continue;
                }
                if let Some(n) = table.cell(row, col).as_number() {
                    let clamped = match (min, max) {
                        _ if min.is_some_and(|m| n < m) => min.unwrap(),
                        _ if max.is_some_and(|m| n > m) => max.unwrap(),
                        _ => n,
                    };
                    table.set_cell(row, col, Cell::Number(clamped));
                    outcome.values_clamped += 1;
                }
            }
            info!(
                column = %column_name,
                count = outcome.values_clamped,
                "clamped out-of-range values"
            );
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnLabel;

    fn numbers(values: &[f64]) -> Table {
        let rows = values.iter().map(|v| vec![Cell::Number(*v)]).collect();
        Table::new(vec![ColumnLabel::single("n")], rows)
    }

    #[test]
    fn test_warn_leaves_table_unchanged() {
        let mut table = numbers(&[-5.0, 10.0, 200.0]);
        let outcome = validate_range(&mut table, 0, Some(0.0), Some(100.0), RangePolicy::Warn);

        assert_eq!(outcome.out_of_range, 2);
        assert_eq!(outcome.offending_values, vec![-5.0, 200.0]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.cell(0, 0), &Cell::Number(-5.0));
    }

    #[test]
    fn test_remove_drops_whole_rows() {
        let mut table = numbers(&[-5.0, 10.0, 200.0]);
        let outcome = validate_range(&mut table, 0, Some(0.0), Some(100.0), RangePolicy::Remove);

        assert_eq!(outcome.rows_removed, 2);
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.cell(0, 0), &Cell::Number(10.0));
    }

    #[test]
    fn test_clamp_preserves_row_count_and_bounds() {
        let mut table = numbers(&[-5.0, 10.0, 200.0]);
        let outcome = validate_range(&mut table, 0, Some(0.0), Some(100.0), RangePolicy::Clamp);

        assert_eq!(outcome.values_clamped, 2);
        assert_eq!(table.n_rows(), 3);
        for cell in table.column_cells(0) {
            let n = cell.as_number().unwrap();
            assert!((0.0..=100.0).contains(&n));
        }
    }

    #[test]
    fn test_missing_and_text_cells_never_flagged() {
        let mut table = Table::new(
            vec![ColumnLabel::single("n")],
            vec![
                vec![Cell::Null],
                vec![Cell::Text("n/a".to_string())],
                vec![Cell::Number(-1.0)],
            ],
        );
        let outcome = validate_range(&mut table, 0, Some(0.0), None, RangePolicy::Warn);
        assert_eq!(outcome.out_of_range, 1);
    }

    #[test]
    fn test_open_ended_bounds() {
        let mut table = numbers(&[-1.0, 5.0]);
        let outcome = validate_range(&mut table, 0, Some(0.0), None, RangePolicy::Warn);
        assert_eq!(outcome.out_of_range, 1);

        let mut table = numbers(&[-1.0, 5.0]);
        let outcome = validate_range(&mut table, 0, None, Some(4.0), RangePolicy::Warn);
        assert_eq!(outcome.out_of_range, 1);
    }
}
