//! Configuration error types
//!
//! Error codes:
//! - SELECT_CONFIG_MISSING (FATAL severity)
//! - SELECT_CONFIG_INVALID (FATAL severity)
//! - SELECT_CONFIG_IO (FATAL severity)

use std::fmt;
use std::io;
use std::path::Path;

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// Document does not exist
    ConfigMissing,
    /// Document exists but cannot be parsed or fails validation
    ConfigInvalid,
    /// Document could not be read or written
    ConfigIo,
}

impl ConfigErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::ConfigMissing => "SELECT_CONFIG_MISSING",
            ConfigErrorCode::ConfigInvalid => "SELECT_CONFIG_INVALID",
            ConfigErrorCode::ConfigIo => "SELECT_CONFIG_IO",
        }
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error raised while loading or persisting `conf.json` / `dtypes.json`
#[derive(Debug)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl ConfigError {
    /// Document not found at path
    pub fn missing(path: &Path) -> Self {
        Self {
            code: ConfigErrorCode::ConfigMissing,
            message: format!("Document not found: {}", path.display()),
            source: None,
        }
    }

    /// Document is malformed or fails validation
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::ConfigInvalid,
            message: message.into(),
            source: None,
        }
    }

    /// I/O failure at path
    pub fn io_error_at_path(path: &Path, source: io::Error) -> Self {
        Self {
            code: ConfigErrorCode::ConfigIo,
            message: format!("I/O error at path: {}", path.display()),
            source: Some(source),
        }
    }

    /// Maps an open failure, distinguishing a missing document
    pub(crate) fn from_open(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::missing(path)
        } else {
            Self::io_error_at_path(path, source)
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FATAL] {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
