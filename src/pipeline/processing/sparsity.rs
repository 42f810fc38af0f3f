//! Sparsity filtering: drop rows or columns whose non-null fraction falls
//! below a threshold. The row pass must run before the column pass.

use crate::domain::Table;

/// Drop rows whose non-null fraction is below `threshold`. Returns the
/// number of rows removed. A zero-column table is treated as fully dense.
pub fn drop_sparse_rows(table: &mut Table, threshold: f64) -> usize {
    if table.n_cols() == 0 {
        return 0;
    }
    let width = table.n_cols() as f64;
    let keep: Vec<bool> = table
        .rows()
        .iter()
        .map(|row| {
            let non_null = row.iter().filter(|c| !c.is_null()).count() as f64;
            non_null / width >= threshold
        })
        .collect();
    table.retain_rows(&keep)
}

/// Drop columns whose non-null fraction is below `threshold`. Returns the
/// number of columns removed. A zero-row table is treated as fully dense.
pub fn drop_sparse_columns(table: &mut Table, threshold: f64) -> usize {
    if table.n_rows() == 0 {
        return 0;
    }
    let height = table.n_rows() as f64;
    let keep: Vec<bool> = (0..table.n_cols())
        .map(|col| {
            let non_null = (height as usize - table.column_null_count(col)) as f64;
            non_null / height >= threshold
        })
        .collect();
    table.retain_columns(&keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, ColumnLabel};

    fn table() -> Table {
        // 4 columns; second row is half empty, third row fully empty
        Table::new(
            vec![
                ColumnLabel::single("a"),
                ColumnLabel::single("b"),
                ColumnLabel::single("c"),
                ColumnLabel::single("d"),
            ],
            vec![
                vec![
                    Cell::Number(1.0),
                    Cell::Number(2.0),
                    Cell::Number(3.0),
                    Cell::Null,
                ],
                vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Null, Cell::Null],
                vec![Cell::Null, Cell::Null, Cell::Null, Cell::Null],
            ],
        )
    }

    #[test]
    fn test_threshold_zero_removes_nothing() {
        let mut t = table();
        assert_eq!(drop_sparse_rows(&mut t, 0.0), 0);
        assert_eq!(drop_sparse_columns(&mut t, 0.0), 0);
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.n_cols(), 4);
    }

    #[test]
    fn test_threshold_one_keeps_only_fully_dense() {
        let mut t = table();
        drop_sparse_rows(&mut t, 1.0);
        assert_eq!(t.n_rows(), 0);
    }

    #[test]
    fn test_default_threshold_drops_empty_row() {
        let mut t = table();
        let removed = drop_sparse_rows(&mut t, 0.5);
        assert_eq!(removed, 1); // only the all-null row goes; 2/4 == 0.5 stays
        assert_eq!(t.n_rows(), 2);
    }

    #[test]
    fn test_column_pass_after_row_pass() {
        let mut t = table();
        drop_sparse_rows(&mut t, 0.5);
        // Remaining rows: d is all null (0/2), c is 1/2
        let removed = drop_sparse_columns(&mut t, 0.5);
        assert_eq!(removed, 1);
        assert_eq!(t.label_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_monotonic_in_threshold() {
        let base = table();
        let mut kept_at = Vec::new();
        for threshold in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let mut t = base.clone();
            drop_sparse_rows(&mut t, threshold);
            kept_at.push(t.n_rows());
        }
        for pair in kept_at.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_empty_table_edges() {
        let mut no_rows = Table::new(vec![ColumnLabel::single("a")], vec![]);
        assert_eq!(drop_sparse_columns(&mut no_rows, 1.0), 0);

        let mut no_cols = Table::new(vec![], vec![]);
        assert_eq!(drop_sparse_rows(&mut no_cols, 1.0), 0);
    }
}
