//! CLI command implementation

use super::args::Cli;
use super::errors::CliResult;
use super::io::write_response;

use crate::select::{run_selection, RunOptions};

/// Main CLI entry point
///
/// Parses arguments and runs the selection.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    select(&cli.into_options())
}

/// Run a selection and print its completion record
pub fn select(options: &RunOptions) -> CliResult<()> {
    let summary = run_selection(options)?;
    write_response(serde_json::to_value(&summary)?)
}
