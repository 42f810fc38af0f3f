//! Routing: pick the cleaning plan for a table from its declared dataset
//! kind and its actual shape.
//!
//! Precedence: hierarchical headers beat everything (a multi-level header
//! means a cross-tabulated export, never a time series), then the presence
//! of a period column, then the declared kind.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{DatasetKind, Table};
use crate::pipeline::processing::period::find_period_column;

/// The closed set of cleaning plans. Each is a fixed ordered list of stage
/// invocations executed by `processing::clean_table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleaningPlan {
    /// Time-series table keyed by academic period: period normalization,
    /// date derivation, strict sparsity, dedup on the period, sorted output.
    Periodic,
    /// Aggregated cross-sectional table: permissive sparsity, full-row
    /// dedup, no period handling.
    Aggregated,
    /// Minimal safety net for unrecognized data.
    Generic,
}

impl CleaningPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningPlan::Periodic => "periodico",
            CleaningPlan::Aggregated => "agregado",
            CleaningPlan::Generic => "generico",
        }
    }
}

/// Select the plan for one table. Pure: inspects the table, mutates nothing.
pub fn route(kind: DatasetKind, table: &Table) -> CleaningPlan {
    if table.has_multi_level_header() {
        info!("multi-level header detected, forcing aggregated plan");
        return CleaningPlan::Aggregated;
    }

    if kind == DatasetKind::Generic {
        return CleaningPlan::Generic;
    }

    if find_period_column(table).is_some() {
        CleaningPlan::Periodic
    } else {
        // Periodic kinds without a findable period column degrade to the
        // aggregated plan instead of failing
        CleaningPlan::Aggregated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, ColumnLabel};

    fn table_with(labels: Vec<ColumnLabel>) -> Table {
        let width = labels.len();
        Table::new(labels, vec![vec![Cell::Null; width]])
    }

    #[test]
    fn test_period_column_selects_periodic_plan() {
        let table = table_with(vec![
            ColumnLabel::single("periodo"),
            ColumnLabel::single("total"),
        ]);
        assert_eq!(
            route(DatasetKind::StudentEnrollment, &table),
            CleaningPlan::Periodic
        );
        assert_eq!(
            route(DatasetKind::AcademicBodies, &table),
            CleaningPlan::Periodic
        );
    }

    #[test]
    fn test_no_period_column_selects_aggregated_plan() {
        let table = table_with(vec![
            ColumnLabel::single("unidad"),
            ColumnLabel::single("total"),
        ]);
        assert_eq!(
            route(DatasetKind::ProgramListing, &table),
            CleaningPlan::Aggregated
        );
        assert_eq!(
            route(DatasetKind::StaffRatio, &table),
            CleaningPlan::Aggregated
        );
        // Even a nominally periodic kind degrades when no period exists
        assert_eq!(
            route(DatasetKind::StudentEnrollment, &table),
            CleaningPlan::Aggregated
        );
    }

    #[test]
    fn test_multi_level_header_beats_everything() {
        let table = table_with(vec![
            ColumnLabel::multi(vec!["periodo".into(), "2020".into()]),
            ColumnLabel::single("total"),
        ]);
        assert_eq!(
            route(DatasetKind::StudentEnrollment, &table),
            CleaningPlan::Aggregated
        );
    }

    #[test]
    fn test_generic_kind_gets_minimal_plan() {
        let table = table_with(vec![
            ColumnLabel::single("periodo"),
            ColumnLabel::single("total"),
        ]);
        assert_eq!(route(DatasetKind::Generic, &table), CleaningPlan::Generic);
    }
}
