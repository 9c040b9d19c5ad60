//! Column stream codec
//!
//! Column files are snappy frame-format streams holding either
//! fixed-width little-endian records or LEB128 unsigned varints.

mod errors;
mod stream;
mod varint;

pub use errors::{CodecError, CodecResult};
pub use stream::{ColumnReader, ColumnWriter};
pub use varint::{encode_uvarint, read_uvarint, write_uvarint, MAX_VARINT_LEN64};
