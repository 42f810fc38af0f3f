//! Cleaning pipeline for UABC institutional indicator spreadsheets.
//!
//! Raw downloads (HTML-table `.xls`, `.xlsx`, `.csv`) are routed through a
//! dataset-type-specific cleaning plan and written back out as UTF-8-BOM
//! CSVs alongside a per-dataset quality report.

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod validator;
