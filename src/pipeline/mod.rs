// Data pipeline: ingestion, processing, and storage of indicator datasets

pub mod ingestion;
pub mod processing;
pub mod storage;

use std::path::Path;
use tracing::{error, info};

use crate::config::Config;
use crate::constants::dataset_kind_for_file;
use crate::domain::DatasetKind;
use crate::error::Result;
use crate::pipeline::processing::router::CleaningPlan;
use crate::pipeline::processing::{clean_table, quality, CleaningWarning};

/// Everything worth reporting about one successfully processed file.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub file: String,
    pub kind: DatasetKind,
    pub plan: CleaningPlan,
    pub rows_before: usize,
    pub rows_after: usize,
    pub cols_before: usize,
    pub cols_after: usize,
    pub warnings: Vec<CleaningWarning>,
    pub output_csv: String,
    pub output_report: String,
}

/// Outcome of one file: processed, or failed with the error message. A
/// failure never aborts the batch.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Processed(ProcessedFile),
    Failed { file: String, error: String },
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl RunSummary {
    pub fn processed(&self) -> impl Iterator<Item = &ProcessedFile> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Processed(p) => Some(p),
            FileOutcome::Failed { .. } => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { file, error } => Some((file.as_str(), error.as_str())),
            FileOutcome::Processed(_) => None,
        })
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

/// Load, clean, report and persist a single raw file.
pub fn process_file(path: &Path, config: &Config) -> Result<ProcessedFile> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let stem = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let kind = dataset_kind_for_file(&file_name);

    info!(file = %file_name, kind = kind.as_str(), "processing dataset");

    let table = ingestion::read_table(path)?;
    let rows_before = table.n_rows();
    let cols_before = table.n_cols();

    let outcome = clean_table(table, kind, &config.cleaning);
    let report = quality::generate_report(&outcome.table, &stem);

    let processed_dir = Path::new(&config.folders.processed);
    let reports_dir = Path::new(&config.folders.reports);
    let csv_path = storage::write_clean_csv(&outcome.table, processed_dir, &stem)?;
    let report_path = storage::write_report(&report, reports_dir, &stem)?;

    Ok(ProcessedFile {
        file: file_name,
        kind,
        plan: outcome.plan,
        rows_before,
        rows_after: outcome.stats.rows_after,
        cols_before,
        cols_after: outcome.stats.cols_after,
        warnings: outcome.warnings,
        output_csv: csv_path.display().to_string(),
        output_report: report_path.display().to_string(),
    })
}

/// Process every raw file, optionally filtered by a name substring. Each
/// file is its own failure domain: a corrupt download is recorded and the
/// loop moves on.
pub fn run(config: &Config, name_filter: Option<&str>) -> Result<RunSummary> {
    storage::ensure_dirs(&[
        Path::new(&config.folders.processed),
        Path::new(&config.folders.reports),
    ])?;

    let files = ingestion::discover_raw_files(Path::new(&config.folders.raw))?;
    let mut summary = RunSummary::default();

    for path in files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if let Some(filter) = name_filter {
            if !file_name.contains(filter) {
                continue;
            }
        }

        let span = tracing::info_span!("dataset", file = %file_name);
        let _enter = span.enter();

        match process_file(&path, config) {
            Ok(processed) => summary.outcomes.push(FileOutcome::Processed(processed)),
            Err(e) => {
                error!(error = %e, "failed to process dataset");
                summary.outcomes.push(FileOutcome::Failed {
                    file: file_name,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}
