//! Validation of downloaded raw files: size, parseability and catalog
//! coverage. Run before cleaning to catch truncated or empty downloads.

use std::fs;
use std::path::Path;

use crate::constants::DATASET_CATALOG;
use crate::error::Result;
use crate::pipeline::ingestion;

/// Result of checking one downloaded file.
#[derive(Debug, Clone)]
pub struct FileCheck {
    pub file: String,
    pub size_kb: f64,
    pub size_ok: bool,
    pub structure_ok: bool,
    pub structure_message: String,
    pub rows: usize,
    pub cols: usize,
}

impl FileCheck {
    pub fn is_valid(&self) -> bool {
        self.size_ok && self.structure_ok
    }
}

/// Which catalog datasets have at least one downloaded file.
#[derive(Debug, Clone)]
pub struct Coverage {
    pub expected: usize,
    pub found: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

impl Coverage {
    pub fn percent(&self) -> f64 {
        if self.expected == 0 {
            return 100.0;
        }
        self.found.len() as f64 / self.expected as f64 * 100.0
    }
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub checks: Vec<FileCheck>,
    pub coverage: Coverage,
}

impl ValidationReport {
    pub fn valid_count(&self) -> usize {
        self.checks.iter().filter(|c| c.is_valid()).count()
    }
}

fn check_file(path: &Path, min_size_kb: u64) -> FileCheck {
    let file = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let size_kb = fs::metadata(path)
        .map(|m| m.len() as f64 / 1024.0)
        .unwrap_or(0.0);
    let size_ok = size_kb >= min_size_kb as f64;

    let (structure_ok, structure_message, rows, cols) = match ingestion::read_table(path) {
        Ok(table) if table.n_rows() == 0 => {
            (false, "tabla vacía (0 filas)".to_string(), 0, table.n_cols())
        }
        Ok(table) if table.n_cols() == 0 => (false, "tabla sin columnas".to_string(), 0, 0),
        Ok(table) => (
            true,
            format!("{} filas x {} columnas", table.n_rows(), table.n_cols()),
            table.n_rows(),
            table.n_cols(),
        ),
        Err(e) => (false, format!("no se pudo leer: {e}"), 0, 0),
    };

    FileCheck {
        file,
        size_kb,
        size_ok,
        structure_ok,
        structure_message,
        rows,
        cols,
    }
}

/// Validate every downloaded file in `dir` and compute catalog coverage.
pub fn validate_downloads(dir: &Path, min_size_kb: u64) -> Result<ValidationReport> {
    let files = ingestion::discover_raw_files(dir)?;
    let checks: Vec<FileCheck> = files.iter().map(|p| check_file(p, min_size_kb)).collect();

    let mut found = Vec::new();
    let mut missing = Vec::new();
    for dataset in DATASET_CATALOG {
        if checks.iter().any(|c| c.file.contains(dataset.name)) {
            found.push(dataset.name);
        } else {
            missing.push(dataset.name);
        }
    }

    Ok(ValidationReport {
        checks,
        coverage: Coverage {
            expected: DATASET_CATALOG.len(),
            found,
            missing,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_valid_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("Relacion_AlumnosProfesor_20240101.csv");
        let mut f = fs::File::create(&good).unwrap();
        // Pad past the size floor
        writeln!(f, "unidad,relacion").unwrap();
        for i in 0..200 {
            writeln!(f, "Unidad {i},25").unwrap();
        }

        let empty = dir.path().join("Personal_Academico_Historico_20240101.csv");
        fs::write(&empty, "a,b\n").unwrap();

        let report = validate_downloads(dir.path(), 1).unwrap();
        assert_eq!(report.checks.len(), 2);
        assert_eq!(report.valid_count(), 1);

        let bad = report
            .checks
            .iter()
            .find(|c| c.file.starts_with("Personal"))
            .unwrap();
        assert!(!bad.structure_ok);
    }

    #[test]
    fn test_coverage_tracks_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Alumnos_Licenciatura_Historico_20240101.csv");
        fs::write(&path, "periodo,total\n2020-1,10\n").unwrap();

        let report = validate_downloads(dir.path(), 0).unwrap();
        assert!(report
            .coverage
            .found
            .contains(&"Alumnos_Licenciatura_Historico"));
        assert!(report
            .coverage
            .missing
            .contains(&"Personal_SNI_Historico"));
        assert!(report.coverage.percent() < 100.0);
    }
}
