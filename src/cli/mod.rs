//! CLI module for colselect
//!
//! A single command: copy `--sourcedir` into `--targetdir`, keeping the
//! rows whose `--idvar` value appears in `--idfile`.

mod args;
mod commands;
mod errors;
mod io;

pub use args::Cli;
pub use commands::{run, select};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
