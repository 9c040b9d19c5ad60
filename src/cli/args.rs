//! CLI argument definitions using clap
//!
//! colselect --idvar <name> --idfile <path> --targetdir <path> --sourcedir <path> [--replace]

use clap::Parser;
use std::path::PathBuf;

use crate::select::{RunOptions, DEFAULT_CONCURRENCY, DEFAULT_LOG_FILE};

/// colselect - copy a bucketed dataset, keeping only the selected records
#[derive(Parser, Debug)]
#[command(name = "colselect")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Variable whose values determine which records are selected
    #[arg(long)]
    pub idvar: String,

    /// File with the values to select, one per line
    #[arg(long)]
    pub idfile: PathBuf,

    /// Destination directory
    #[arg(long)]
    pub targetdir: PathBuf,

    /// Source directory
    #[arg(long)]
    pub sourcedir: PathBuf,

    /// Overwrite existing contents of the destination
    #[arg(long)]
    pub replace: bool,

    /// Maximum number of buckets processed at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Run log location
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Convert into run options
    pub fn into_options(self) -> RunOptions {
        RunOptions::new(self.idvar, self.idfile, self.targetdir, self.sourcedir)
            .with_replace(self.replace)
            .with_concurrency(self.concurrency)
            .with_log_file(self.log_file)
    }
}
