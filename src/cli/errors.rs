//! CLI-specific error types
//!
//! All CLI errors are fatal: the process exits non-zero.

use std::fmt;
use std::io;

use crate::select::{SelectError, SelectErrorCode};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Bad parameters or target layout; nothing was written
    UsageError,
    /// Configuration, type metadata or identifier file error
    ConfigError,
    /// Selection failed after it started writing
    SelectionFailed,
    /// I/O error (stdout)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UsageError => "SELECT_CLI_USAGE_ERROR",
            Self::ConfigError => "SELECT_CLI_CONFIG_ERROR",
            Self::SelectionFailed => "SELECT_CLI_SELECTION_FAILED",
            Self::IoError => "SELECT_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<SelectError> for CliError {
    fn from(e: SelectError) -> Self {
        let code = match e.code() {
            SelectErrorCode::PreflightFailed => CliErrorCode::UsageError,
            SelectErrorCode::ConfigInvalid | SelectErrorCode::IdsInvalid => {
                CliErrorCode::ConfigError
            }
            SelectErrorCode::StreamCorrupt
            | SelectErrorCode::StreamDesync
            | SelectErrorCode::UnsupportedType
            | SelectErrorCode::Io => CliErrorCode::SelectionFailed,
        };
        Self::new(code, e.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
