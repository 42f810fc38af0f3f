use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Runtime configuration, loaded from an optional `config.toml`. Every field
/// has a default so the binary runs without any config file present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub folders: Folders,
    pub cleaning: CleaningConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Folders {
    pub raw: String,
    pub processed: String,
    pub reports: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Minimum non-null fraction for the periodic and generic plans.
    pub sparsity_threshold: f64,
    /// More permissive threshold used by the aggregated plan.
    pub aggregated_sparsity_threshold: f64,
    /// Minimum size in kilobytes for a downloaded file to be considered valid.
    pub min_file_size_kb: u64,
}

impl Default for Folders {
    fn default() -> Self {
        Self {
            raw: "downloads/raw".to_string(),
            processed: "downloads/processed".to_string(),
            reports: "downloads/reportes".to_string(),
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            sparsity_threshold: 0.5,
            aggregated_sparsity_threshold: 0.3,
            min_file_size_kb: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            folders: Folders::default(),
            cleaning: CleaningConfig::default(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_from("does_not_exist.toml").unwrap();
        assert_eq!(config.folders.raw, "downloads/raw");
        assert_eq!(config.cleaning.sparsity_threshold, 0.5);
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[cleaning]\nsparsity_threshold = 0.8").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.cleaning.sparsity_threshold, 0.8);
        // Untouched sections keep their defaults
        assert_eq!(config.folders.reports, "downloads/reportes");
    }
}
