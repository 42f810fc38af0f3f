//! Output writers: cleaned CSV (UTF-8 with BOM, for spreadsheet tools that
//! otherwise mangle accents) and the per-dataset quality report.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::Table;
use crate::error::Result;
use crate::pipeline::processing::quality::QualityReport;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Suffix appended to a dataset stem for its cleaned CSV.
pub const CLEAN_SUFFIX: &str = "_limpio.csv";

/// Suffix appended to a dataset stem for its text report.
pub const REPORT_SUFFIX: &str = "_reporte.txt";

pub fn ensure_dirs(dirs: &[&Path]) -> Result<()> {
    for dir in dirs {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Write `<stem>_limpio.csv` into `dir`. Returns the written path.
pub fn write_clean_csv(table: &Table, dir: &Path, stem: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{stem}{CLEAN_SUFFIX}"));
    let mut file = fs::File::create(&path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(table.label_names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|c| c.render()))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = table.n_rows(), "wrote cleaned CSV");
    Ok(path)
}

/// Write `<stem>_reporte.txt` plus a JSON twin for machine consumers.
pub fn write_report(report: &QualityReport, dir: &Path, stem: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{stem}{REPORT_SUFFIX}"));
    fs::write(&path, report.render_text())?;

    let json_path = dir.join(format!("{stem}_reporte.json"));
    fs::write(&json_path, serde_json::to_string_pretty(report)?)?;

    info!(path = %path.display(), "wrote quality report");
    Ok(path)
}
