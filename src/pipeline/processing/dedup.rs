//! Duplicate-row removal, optionally keyed by a subset of columns.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::domain::{Cell, Table};

/// Which occurrence of a duplicate group survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keep {
    First,
    Last,
}

fn row_key(row: &[Cell], key_cols: &[usize]) -> String {
    let mut key = String::new();
    for &col in key_cols {
        // Null renders empty, so separate fields unambiguously
        key.push('\u{1f}');
        match &row[col] {
            Cell::Null => key.push('\u{0}'),
            other => key.push_str(&other.render()),
        }
    }
    key
}

/// Remove rows duplicating a previous row on `key_columns` (all columns when
/// empty), retaining the `keep` occurrence. Returns the number removed.
/// Applying this twice in a row is a no-op the second time.
pub fn drop_duplicates(table: &mut Table, key_columns: &[usize], keep: Keep) -> usize {
    let key_cols: Vec<usize> = if key_columns.is_empty() {
        (0..table.n_cols()).collect()
    } else {
        key_columns.to_vec()
    };

    let n = table.n_rows();
    let mut retain = vec![true; n];
    let mut seen: HashSet<String> = HashSet::new();

    let order: Box<dyn Iterator<Item = usize>> = match keep {
        Keep::First => Box::new(0..n),
        Keep::Last => Box::new((0..n).rev()),
    };
    for row in order {
        let key = row_key(&table.rows()[row], &key_cols);
        if !seen.insert(key) {
            retain[row] = false;
        }
    }

    let removed = table.retain_rows(&retain);
    if removed > 0 {
        info!(removed, "removed duplicate rows");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnLabel;

    fn table() -> Table {
        Table::new(
            vec![ColumnLabel::single("periodo"), ColumnLabel::single("total")],
            vec![
                vec![Cell::Text("2020-1".into()), Cell::Number(10.0)],
                vec![Cell::Text("2020-2".into()), Cell::Number(20.0)],
                vec![Cell::Text("2020-1".into()), Cell::Number(15.0)],
            ],
        )
    }

    #[test]
    fn test_keyed_dedup_keeps_first() {
        let mut t = table();
        let removed = drop_duplicates(&mut t, &[0], Keep::First);
        assert_eq!(removed, 1);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.cell(0, 1), &Cell::Number(10.0));
    }

    #[test]
    fn test_keyed_dedup_keeps_last() {
        let mut t = table();
        let removed = drop_duplicates(&mut t, &[0], Keep::Last);
        assert_eq!(removed, 1);
        // Surviving 2020-1 row is the later one
        assert_eq!(t.cell(1, 1), &Cell::Number(15.0));
    }

    #[test]
    fn test_full_row_dedup_spares_distinct_totals() {
        let mut t = table();
        let removed = drop_duplicates(&mut t, &[], Keep::First);
        // Same period but different totals: not duplicates on all columns
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let mut t = table();
        drop_duplicates(&mut t, &[0], Keep::First);
        let second = drop_duplicates(&mut t, &[0], Keep::First);
        assert_eq!(second, 0);
    }

    #[test]
    fn test_null_and_empty_text_are_distinct_keys() {
        let mut t = Table::new(
            vec![ColumnLabel::single("k")],
            vec![vec![Cell::Null], vec![Cell::Text(String::new())]],
        );
        let removed = drop_duplicates(&mut t, &[0], Keep::First);
        assert_eq!(removed, 0);
    }
}
