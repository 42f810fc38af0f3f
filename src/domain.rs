use serde::{Deserialize, Serialize};

/// A single cell value as loaded from a spreadsheet export.
///
/// Cells start out as `Text` or `Null`; the type coercer rewrites whole
/// columns so that downstream stages only ever see homogeneous columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from raw text, trimming whitespace and mapping the
    /// empty string to `Null`.
    pub fn from_raw(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Cell::Null
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render the cell for CSV output and duplicate keys. Whole numbers are
    /// printed without a fractional part so `2018` never becomes `"2018.0"`.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Text(s) => s.clone(),
        }
    }
}

/// The homogeneous type of a column after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
    /// Every cell is missing; neither numeric nor textual.
    Empty,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numerico",
            ColumnKind::Text => "texto",
            ColumnKind::Empty => "vacio",
        }
    }
}

/// Classification tag driving which cleaning policy applies to a source
/// file. Assigned from the file name before routing; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetKind {
    StudentEnrollment,
    AcademicStaff,
    ResearchStaff,
    AcademicBodies,
    ProgramListing,
    StaffRatio,
    Generic,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::StudentEnrollment => "alumnos",
            DatasetKind::AcademicStaff => "personal_academico",
            DatasetKind::ResearchStaff => "personal_sni",
            DatasetKind::AcademicBodies => "cuerpos",
            DatasetKind::ProgramListing => "programas",
            DatasetKind::StaffRatio => "relacion",
            DatasetKind::Generic => "generico",
        }
    }
}

/// A column label, possibly hierarchical (multi-level header) before the
/// column normalizer flattens it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLabel {
    levels: Vec<String>,
}

impl ColumnLabel {
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            levels: vec![name.into()],
        }
    }

    pub fn multi(levels: Vec<String>) -> Self {
        debug_assert!(!levels.is_empty());
        Self { levels }
    }

    pub fn is_multi_level(&self) -> bool {
        self.levels.len() > 1
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Join all levels into one flat label. Single-level labels come back
    /// unchanged apart from trimming.
    pub fn flatten(&self) -> String {
        self.levels
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join("_")
            .trim()
            .to_string()
    }
}

/// An in-memory table: ordered labels plus row-major cells. Every row has
/// exactly `labels.len()` cells; the constructor pads or truncates ragged
/// rows coming out of the HTML reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    labels: Vec<ColumnLabel>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(labels: Vec<ColumnLabel>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = labels.len();
        for row in &mut rows {
            row.resize(width, Cell::Null);
        }
        Self { labels, rows }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[ColumnLabel] {
        &self.labels
    }

    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.flatten()).collect()
    }

    pub fn set_labels(&mut self, labels: Vec<ColumnLabel>) {
        debug_assert_eq!(labels.len(), self.labels.len());
        self.labels = labels;
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.rows[row][col] = cell;
    }

    /// True when any label still carries more than one header level.
    pub fn has_multi_level_header(&self) -> bool {
        self.labels.iter().any(|l| l.is_multi_level())
    }

    /// Exact match on the flattened label.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.flatten() == name)
    }

    /// First column whose flattened, lowercased label contains `needle`.
    pub fn find_column_containing(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_lowercase();
        self.labels
            .iter()
            .position(|l| l.flatten().to_lowercase().contains(&needle))
    }

    /// Append a new column on the right.
    pub fn push_column(&mut self, name: impl Into<String>, mut cells: Vec<Cell>) {
        cells.resize(self.rows.len(), Cell::Null);
        self.labels.push(ColumnLabel::single(name));
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    /// Keep only the rows flagged `true`; returns how many were removed.
    pub fn retain_rows(&mut self, keep: &[bool]) -> usize {
        debug_assert_eq!(keep.len(), self.rows.len());
        let before = self.rows.len();
        let mut it = keep.iter();
        self.rows.retain(|_| *it.next().unwrap_or(&true));
        before - self.rows.len()
    }

    /// Keep only the columns flagged `true`; returns how many were removed.
    pub fn retain_columns(&mut self, keep: &[bool]) -> usize {
        debug_assert_eq!(keep.len(), self.labels.len());
        let before = self.labels.len();
        let mut it = keep.iter();
        self.labels.retain(|_| *it.next().unwrap_or(&true));
        for row in &mut self.rows {
            let mut it = keep.iter();
            row.retain(|_| *it.next().unwrap_or(&true));
        }
        before - self.labels.len()
    }

    pub fn column_cells(&self, col: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[col])
    }

    pub fn column_null_count(&self, col: usize) -> usize {
        self.column_cells(col).filter(|c| c.is_null()).count()
    }

    /// The homogeneous kind of a column. A column with any text cell is
    /// `Text`; all-numeric (ignoring nulls) is `Numeric`; all-null is `Empty`.
    pub fn column_kind(&self, col: usize) -> ColumnKind {
        let mut saw_number = false;
        for cell in self.column_cells(col) {
            match cell {
                Cell::Text(_) => return ColumnKind::Text,
                Cell::Number(_) => saw_number = true,
                Cell::Null => {}
            }
        }
        if saw_number {
            ColumnKind::Numeric
        } else {
            ColumnKind::Empty
        }
    }

    /// Stable ascending sort on the rendered value of one column. Null cells
    /// sort first.
    pub fn sort_rows_by(&mut self, col: usize) {
        self.rows.sort_by(|a, b| {
            let ka = (&a[col]).render();
            let kb = (&b[col]).render();
            match (a[col].is_null(), b[col].is_null()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                (false, false) => ka.cmp(&kb),
            }
        });
    }

    /// Rough in-memory footprint in bytes, for the quality report.
    pub fn memory_bytes(&self) -> usize {
        let mut total = 0usize;
        for label in &self.labels {
            total += label.levels.iter().map(|l| l.len() + 24).sum::<usize>();
        }
        for row in &self.rows {
            for cell in row {
                total += match cell {
                    Cell::Null => std::mem::size_of::<Cell>(),
                    Cell::Number(_) => std::mem::size_of::<Cell>(),
                    Cell::Text(s) => std::mem::size_of::<Cell>() + s.len(),
                };
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec![ColumnLabel::single("a"), ColumnLabel::single("b")],
            vec![
                vec![Cell::Number(1.0), Cell::Text("x".into())],
                vec![Cell::Null, Cell::Text("y".into())],
            ],
        )
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let t = Table::new(
            vec![ColumnLabel::single("a"), ColumnLabel::single("b")],
            vec![vec![Cell::Number(1.0)]],
        );
        assert_eq!(t.cell(0, 1), &Cell::Null);
    }

    #[test]
    fn test_column_kind_detection() {
        let t = sample();
        assert_eq!(t.column_kind(0), ColumnKind::Numeric);
        assert_eq!(t.column_kind(1), ColumnKind::Text);
    }

    #[test]
    fn test_retain_rows_reports_removed() {
        let mut t = sample();
        let removed = t.retain_rows(&[true, false]);
        assert_eq!(removed, 1);
        assert_eq!(t.n_rows(), 1);
    }

    #[test]
    fn test_retain_columns_shrinks_every_row() {
        let mut t = sample();
        let removed = t.retain_columns(&[false, true]);
        assert_eq!(removed, 1);
        assert_eq!(t.n_cols(), 1);
        assert_eq!(t.rows()[0].len(), 1);
    }

    #[test]
    fn test_whole_numbers_render_without_fraction() {
        assert_eq!(Cell::Number(2018.0).render(), "2018");
        assert_eq!(Cell::Number(2.5).render(), "2.5");
        assert_eq!(Cell::Null.render(), "");
    }

    #[test]
    fn test_multi_level_label_flattens_with_underscore() {
        let label = ColumnLabel::multi(vec!["Campus ".into(), " Unidad".into()]);
        assert!(label.is_multi_level());
        assert_eq!(label.flatten(), "Campus_Unidad");
    }
}
