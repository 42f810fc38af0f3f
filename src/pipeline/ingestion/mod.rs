//! Raw-file discovery and format dispatch.

pub mod delimited;
pub mod excel;
pub mod html;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::Table;
use crate::error::{CleanError, Result};

/// Extensions the pipeline knows how to read.
const SUPPORTED_EXTENSIONS: &[&str] = &["xls", "xlsx", "csv"];

/// List every readable raw file in `dir`, sorted by name for a stable
/// processing order.
pub fn discover_raw_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        if matches!(ext.as_deref(), Some(e) if SUPPORTED_EXTENSIONS.contains(&e)) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read one raw file into a table. The portal's `.xls` downloads are HTML
/// documents, not binary spreadsheets.
pub fn read_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    debug!(path = %path.display(), ext = %ext, "reading raw file");
    match ext.as_str() {
        "xls" => html::read_html_table(path),
        "xlsx" => excel::read_excel(path),
        "csv" => delimited::read_csv(path),
        other => Err(CleanError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_discovery_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xls", "a.csv", "notas.txt", "c.xlsx"] {
            let mut f = fs::File::create(dir.path().join(name)).unwrap();
            writeln!(f, "x").unwrap();
        }

        let files = discover_raw_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.xls", "c.xlsx"]);
    }

    #[test]
    fn test_unsupported_extension_is_an_error() {
        let err = read_table(Path::new("algo.pdf")).unwrap_err();
        assert!(matches!(err, CleanError::UnsupportedFormat(_)));
    }
}
