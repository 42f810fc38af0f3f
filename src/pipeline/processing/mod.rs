//! Cleaning stages and their composition into per-plan pipelines.

pub mod coerce;
pub mod columns;
pub mod dedup;
pub mod period;
pub mod quality;
pub mod range;
pub mod router;
pub mod sparsity;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::CleaningConfig;
use crate::domain::{ColumnKind, DatasetKind, Table};
use dedup::Keep;
use range::RangePolicy;
use router::CleaningPlan;

/// A non-fatal problem surfaced during cleaning. Nothing in the pipeline
/// raises; everything lands here for the run summary and the report.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningWarning {
    pub stage: &'static str,
    pub column: Option<String>,
    pub message: String,
}

/// Counters accumulated across the stages of one cleaning run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningStats {
    pub rows_before: usize,
    pub cols_before: usize,
    pub rows_after: usize,
    pub cols_after: usize,
    pub sparse_rows_removed: usize,
    pub sparse_columns_removed: usize,
    pub duplicates_removed: usize,
    pub out_of_range_values: usize,
}

/// The result of cleaning one table.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: Table,
    pub plan: CleaningPlan,
    pub warnings: Vec<CleaningWarning>,
    pub stats: CleaningStats,
}

/// Clean one table according to its routed plan. Consumes the input table;
/// each stage owns the data exclusively while it runs.
pub fn clean_table(mut table: Table, kind: DatasetKind, config: &CleaningConfig) -> CleanOutcome {
    let mut warnings = Vec::new();
    let mut stats = CleaningStats {
        rows_before: table.n_rows(),
        cols_before: table.n_cols(),
        ..Default::default()
    };

    // Routing inspects the raw header, before any label rewriting
    let plan = router::route(kind, &table);
    info!(kind = kind.as_str(), plan = plan.as_str(), "cleaning table");

    let collisions = columns::normalize_labels(&mut table).collisions;
    for name in collisions {
        warnings.push(CleaningWarning {
            stage: "columns",
            column: Some(name.clone()),
            message: format!("distinct labels collapsed to '{name}', suffixed to keep both"),
        });
    }

    match plan {
        CleaningPlan::Periodic => {
            let threshold = config.sparsity_threshold;
            if let Some(col) = period::find_period_column(&table) {
                let invalid = period::normalize_periods(&mut table, col);
                if !invalid.is_empty() {
                    warnings.push(CleaningWarning {
                        stage: "period",
                        column: Some(table.label_names()[col].clone()),
                        message: format!("invalid periods retained: {}", invalid.join(", ")),
                    });
                }
                period::derive_date_column(&mut table, col);
            }

            coerce::coerce_types(&mut table);
            stats.sparse_rows_removed = sparsity::drop_sparse_rows(&mut table, threshold);
            stats.sparse_columns_removed = sparsity::drop_sparse_columns(&mut table, threshold);

            validate_numeric_columns(&mut table, &mut warnings, &mut stats);

            // Sparsity can have removed the period column itself
            if let Some(col) = period::find_period_column(&table) {
                stats.duplicates_removed = dedup::drop_duplicates(&mut table, &[col], Keep::First);
                table.sort_rows_by(col);
            } else {
                stats.duplicates_removed = dedup::drop_duplicates(&mut table, &[], Keep::First);
            }
        }
        CleaningPlan::Aggregated => {
            let threshold = config.aggregated_sparsity_threshold;
            coerce::coerce_types(&mut table);
            stats.sparse_rows_removed = sparsity::drop_sparse_rows(&mut table, threshold);
            stats.sparse_columns_removed = sparsity::drop_sparse_columns(&mut table, threshold);

            validate_numeric_columns(&mut table, &mut warnings, &mut stats);

            stats.duplicates_removed = dedup::drop_duplicates(&mut table, &[], Keep::First);
        }
        CleaningPlan::Generic => {
            let threshold = config.sparsity_threshold;
            coerce::coerce_types(&mut table);
            stats.sparse_rows_removed = sparsity::drop_sparse_rows(&mut table, threshold);
            stats.sparse_columns_removed = sparsity::drop_sparse_columns(&mut table, threshold);
        }
    }

    stats.rows_after = table.n_rows();
    stats.cols_after = table.n_cols();
    debug!(?stats, "cleaning finished");

    CleanOutcome {
        table,
        plan,
        warnings,
        stats,
    }
}

/// Run the range validator (min 0, warn) over every numeric column except
/// the derived date. Counts are negative nowhere in this domain.
fn validate_numeric_columns(
    table: &mut Table,
    warnings: &mut Vec<CleaningWarning>,
    stats: &mut CleaningStats,
) {
    for col in 0..table.n_cols() {
        let name = table.label_names()[col].clone();
        if name == period::DATE_COLUMN || table.column_kind(col) != ColumnKind::Numeric {
            continue;
        }
        let outcome = range::validate_range(table, col, Some(0.0), None, RangePolicy::Warn);
        if outcome.out_of_range > 0 {
            stats.out_of_range_values += outcome.out_of_range;
            warnings.push(CleaningWarning {
                stage: "range",
                column: Some(name),
                message: format!(
                    "{} values below 0: {:?}",
                    outcome.out_of_range, outcome.offending_values
                ),
            });
        }
    }
}
