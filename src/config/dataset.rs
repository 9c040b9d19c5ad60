//! Dataset configuration (`conf.json`)

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use super::layout::config_path;

/// Configuration record stored at the root of every dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetConfig {
    /// Number of buckets in the dataset
    pub num_buckets: usize,

    /// Compression tag of the column streams (informational)
    #[serde(default)]
    pub compression: String,

    /// Directory holding factor code labels
    #[serde(default)]
    pub codes_dir: String,
}

impl DatasetConfig {
    /// Load the configuration stored in a dataset root.
    pub fn load(root: &Path) -> ConfigResult<Self> {
        let path = config_path(root);
        let content =
            fs::read_to_string(&path).map_err(|e| ConfigError::from_open(&path, e))?;

        let config: DatasetConfig = serde_json::from_str(&content).map_err(|e| {
            ConfigError::invalid(format!("Invalid config JSON in {}: {}", path.display(), e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Persist the configuration into a dataset root.
    pub fn write(&self, root: &Path) -> ConfigResult<()> {
        let path = config_path(root);
        let file = File::create(&path).map_err(|e| ConfigError::io_error_at_path(&path, e))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, self)
            .map_err(|e| ConfigError::invalid(format!("Failed to encode config: {}", e)))?;
        writeln!(writer).map_err(|e| ConfigError::io_error_at_path(&path, e))?;
        writer
            .flush()
            .map_err(|e| ConfigError::io_error_at_path(&path, e))
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.codes_dir.trim().is_empty() {
            return Err(ConfigError::invalid("CodesDir must not be empty"));
        }
        Ok(())
    }

    /// Returns a copy whose label directory points at `codes_dir`.
    pub fn with_codes_dir(&self, codes_dir: &Path) -> Self {
        Self {
            codes_dir: codes_dir.to_string_lossy().into_owned(),
            ..self.clone()
        }
    }

    /// Label directory as a path
    pub fn codes_path(&self) -> PathBuf {
        PathBuf::from(&self.codes_dir)
    }
}
