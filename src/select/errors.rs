//! Selection error types
//!
//! Error codes:
//! - SELECT_PREFLIGHT_FAILED (FATAL severity)
//! - SELECT_CONFIG_INVALID (FATAL severity)
//! - SELECT_IDS_INVALID (FATAL severity)
//! - SELECT_STREAM_CORRUPT (FATAL severity)
//! - SELECT_STREAM_DESYNC (FATAL severity)
//! - SELECT_UNSUPPORTED_TYPE (FATAL severity)
//! - SELECT_IO_ERROR (FATAL severity)
//!
//! Every selection error aborts the whole run. There is no partial
//! output quarantine and no retry.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::Path;

use crate::codec::CodecError;
use crate::config::{ConfigError, DType};
use crate::ids::IdsError;

/// Severity levels for selection errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Run must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Selection error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectErrorCode {
    /// Bad parameters or target layout, detected before any mutation
    PreflightFailed,
    /// Malformed or missing configuration / type metadata
    ConfigInvalid,
    /// Malformed identifier file
    IdsInvalid,
    /// Corrupt or truncated compressed column stream
    StreamCorrupt,
    /// Column record count disagrees with the selection mask
    StreamDesync,
    /// Column type with no transcoder
    UnsupportedType,
    /// Filesystem failure
    Io,
}

impl SelectErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SelectErrorCode::PreflightFailed => "SELECT_PREFLIGHT_FAILED",
            SelectErrorCode::ConfigInvalid => "SELECT_CONFIG_INVALID",
            SelectErrorCode::IdsInvalid => "SELECT_IDS_INVALID",
            SelectErrorCode::StreamCorrupt => "SELECT_STREAM_CORRUPT",
            SelectErrorCode::StreamDesync => "SELECT_STREAM_DESYNC",
            SelectErrorCode::UnsupportedType => "SELECT_UNSUPPORTED_TYPE",
            SelectErrorCode::Io => "SELECT_IO_ERROR",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for SelectErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Selection error with context
#[derive(Debug)]
pub struct SelectError {
    /// Error code
    code: SelectErrorCode,
    /// Human-readable message
    message: String,
    /// Where it happened (bucket, column, path)
    details: Option<String>,
    /// Underlying cause
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl SelectError {
    fn new(code: SelectErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Preconditions not met; nothing has been modified
    pub fn preflight(message: impl Into<String>) -> Self {
        Self::new(SelectErrorCode::PreflightFailed, message)
    }

    /// Column record count disagrees with the mask
    pub fn desync(message: impl Into<String>) -> Self {
        Self::new(SelectErrorCode::StreamDesync, message)
    }

    /// Column type has no transcoder
    pub fn unsupported_type(column: &str, dtype: DType) -> Self {
        Self::new(
            SelectErrorCode::UnsupportedType,
            format!("Column '{}' has unsupported type '{}'", column, dtype),
        )
    }

    /// Filesystem failure at path
    pub fn io_error_at_path(path: &Path, source: io::Error) -> Self {
        Self::new(
            SelectErrorCode::Io,
            format!("I/O error at path: {}", path.display()),
        )
        .with_source(source)
    }

    /// Classify a codec failure as stream corruption or plain I/O
    pub fn from_codec(err: CodecError) -> Self {
        let code = if err.is_corruption() {
            SelectErrorCode::StreamCorrupt
        } else {
            SelectErrorCode::Io
        };
        Self::new(code, err.to_string()).with_source(err)
    }

    /// Add details to an error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SelectErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Every selection error aborts the run
    pub fn is_fatal(&self) -> bool {
        true
    }
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl StdError for SelectError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn StdError + 'static))
    }
}

impl From<ConfigError> for SelectError {
    fn from(err: ConfigError) -> Self {
        Self::new(SelectErrorCode::ConfigInvalid, err.message().to_string()).with_source(err)
    }
}

impl From<IdsError> for SelectError {
    fn from(err: IdsError) -> Self {
        Self::new(SelectErrorCode::IdsInvalid, err.to_string()).with_source(err)
    }
}

impl From<CodecError> for SelectError {
    fn from(err: CodecError) -> Self {
        Self::from_codec(err)
    }
}

/// Result type for selection operations
pub type SelectResult<T> = Result<T, SelectError>;
