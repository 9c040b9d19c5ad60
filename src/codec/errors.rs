//! Codec error types

use std::io;

use thiserror::Error;

/// Result type for column stream decoding and encoding
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while decoding or encoding a column stream
#[derive(Debug, Error)]
pub enum CodecError {
    /// Underlying read, write or decompression failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stream ended inside a fixed-width record
    #[error("Truncated record: expected {expected} bytes, got {got}")]
    TruncatedRecord { expected: usize, got: usize },

    /// Stream ended inside a varint
    #[error("Truncated varint after {0} bytes")]
    TruncatedVarint(usize),

    /// Varint does not fit in 64 bits
    #[error("Varint overflows a 64-bit integer")]
    VarintOverflow,

    /// Snappy encoder could not be finalized
    #[error("Failed to finalize compressed stream: {0}")]
    Finalize(String),
}

impl CodecError {
    /// Returns true if the stream itself is damaged, as opposed to an
    /// environmental I/O failure.
    pub fn is_corruption(&self) -> bool {
        match self {
            CodecError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof | io::ErrorKind::Other
            ),
            CodecError::TruncatedRecord { .. }
            | CodecError::TruncatedVarint(_)
            | CodecError::VarintOverflow => true,
            CodecError::Finalize(_) => false,
        }
    }
}
