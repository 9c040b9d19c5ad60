//! Run options and the immutable run context
//!
//! Everything a partition job needs is carried by [`RunContext`], built
//! once by the orchestrator and shared by reference across jobs.

use std::path::{Path, PathBuf};

use crate::config::{column_path, dtypes_path, DatasetConfig};
use crate::ids::IdentifierSet;
use crate::observability::{RunLog, SelectMetrics};

/// Default ceiling on concurrently running partition jobs
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Default run log location
pub const DEFAULT_LOG_FILE: &str = "select.log";

/// Parameters of one selection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Column whose values decide which rows are kept
    pub key_column: String,
    /// Text file with one identifier per line
    pub id_file: PathBuf,
    /// Root of the dataset to write
    pub target_dir: PathBuf,
    /// Root of the dataset to read
    pub source_dir: PathBuf,
    /// Allow writing into an existing target
    pub replace: bool,
    /// Maximum partitions processed at once
    pub concurrency: usize,
    pub log_file: PathBuf,
}

impl RunOptions {
    pub fn new(
        key_column: impl Into<String>,
        id_file: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key_column: key_column.into(),
            id_file: id_file.into(),
            target_dir: target_dir.into(),
            source_dir: source_dir.into(),
            replace: false,
            concurrency: DEFAULT_CONCURRENCY,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }
}

/// Read-only state shared by every partition job of a run.
#[derive(Debug)]
pub struct RunContext {
    source_dir: PathBuf,
    target_dir: PathBuf,
    key_column: String,
    ids: IdentifierSet,
    config: DatasetConfig,
    log: RunLog,
    metrics: SelectMetrics,
}

impl RunContext {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        key_column: impl Into<String>,
        ids: IdentifierSet,
        config: DatasetConfig,
        log: RunLog,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            key_column: key_column.into(),
            ids,
            config,
            log,
            metrics: SelectMetrics::new(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn ids(&self) -> &IdentifierSet {
        &self.ids
    }

    /// Configuration of the source dataset
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    pub fn metrics(&self) -> &SelectMetrics {
        &self.metrics
    }

    pub fn source_column(&self, bucket: usize, column: &str) -> PathBuf {
        column_path(&self.source_dir, bucket, column)
    }

    pub fn target_column(&self, bucket: usize, column: &str) -> PathBuf {
        column_path(&self.target_dir, bucket, column)
    }

    pub fn source_dtypes(&self, bucket: usize) -> PathBuf {
        dtypes_path(&self.source_dir, bucket)
    }

    pub fn target_dtypes(&self, bucket: usize) -> PathBuf {
        dtypes_path(&self.target_dir, bucket)
    }
}
