//! Post-cleaning quality report: shape, nullness, duplication and numeric
//! distribution of a cleaned table. Pure over the table; callers decide
//! whether to persist it.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;

use crate::domain::{Cell, ColumnKind, Table};

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub dataset: String,
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<ColumnQuality>,
    pub duplicate_rows: usize,
    pub memory_bytes: usize,
    pub numeric_stats: Vec<NumericSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnQuality {
    pub name: String,
    pub kind: &'static str,
    pub null_count: usize,
    pub null_pct: f64,
}

/// Descriptive statistics for one numeric column, pandas-`describe` style.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Linearly interpolated percentile over an already-sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn summarize_numeric(table: &Table, col: usize, name: &str) -> Option<NumericSummary> {
    let mut values: Vec<f64> = table
        .column_cells(col)
        .filter_map(|c| c.as_number())
        .collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    // Sample standard deviation; zero for a single observation
    let std = if count > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    } else {
        0.0
    };

    Some(NumericSummary {
        column: name.to_string(),
        count,
        mean,
        std,
        min: values[0],
        q25: percentile(&values, 0.25),
        median: percentile(&values, 0.5),
        q75: percentile(&values, 0.75),
        max: values[count - 1],
    })
}

fn count_duplicate_rows(table: &Table) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = 0;
    for row in table.rows() {
        let mut key = String::new();
        for cell in row {
            key.push('\u{1f}');
            match cell {
                Cell::Null => key.push('\u{0}'),
                other => key.push_str(&other.render()),
            }
        }
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}

/// Compute the quality report for a cleaned table.
pub fn generate_report(table: &Table, dataset: &str) -> QualityReport {
    let names = table.label_names();
    let n_rows = table.n_rows();

    let mut columns = Vec::with_capacity(table.n_cols());
    let mut numeric_stats = Vec::new();

    for col in 0..table.n_cols() {
        let kind = table.column_kind(col);
        let null_count = table.column_null_count(col);
        let null_pct = if n_rows == 0 {
            0.0
        } else {
            null_count as f64 / n_rows as f64 * 100.0
        };
        columns.push(ColumnQuality {
            name: names[col].clone(),
            kind: kind.as_str(),
            null_count,
            null_pct,
        });
        if kind == ColumnKind::Numeric {
            if let Some(summary) = summarize_numeric(table, col, &names[col]) {
                numeric_stats.push(summary);
            }
        }
    }

    QualityReport {
        dataset: dataset.to_string(),
        n_rows,
        n_cols: table.n_cols(),
        columns,
        duplicate_rows: count_duplicate_rows(table),
        memory_bytes: table.memory_bytes(),
        numeric_stats,
    }
}

impl QualityReport {
    /// Render the plain-text report persisted next to the cleaned CSV.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "REPORTE DE CALIDAD: {}", self.dataset);
        let _ = writeln!(out, "{}", "=".repeat(80));
        let _ = writeln!(out);
        let _ = writeln!(out, "Filas: {}", self.n_rows);
        let _ = writeln!(out, "Columnas: {}", self.n_cols);
        let _ = writeln!(out);
        let _ = writeln!(out, "Columnas:");
        for col in &self.columns {
            let _ = writeln!(out, "  - {} ({})", col.name, col.kind);
            if col.null_count > 0 {
                let _ = writeln!(
                    out,
                    "    Nulos: {} ({:.1}%)",
                    col.null_count, col.null_pct
                );
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Filas duplicadas: {}", self.duplicate_rows);
        let _ = writeln!(
            out,
            "Memoria: {:.2} MB",
            self.memory_bytes as f64 / 1024.0 / 1024.0
        );
        if !self.numeric_stats.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Estadísticas numéricas:");
            for s in &self.numeric_stats {
                let _ = writeln!(
                    out,
                    "  - {}: n={} media={:.2} std={:.2} min={} q25={} mediana={} q75={} max={}",
                    s.column, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
                );
            }
        }
        out
    }
}
