//! LEB128 unsigned varints
//!
//! Seven payload bits per byte, least significant group first, high bit set
//! on every byte but the last. A u64 takes at most ten bytes.

use std::io::{self, BufRead, Write};

use super::errors::{CodecError, CodecResult};

/// Maximum encoded length of a u64
pub const MAX_VARINT_LEN64: usize = 10;

/// Encodes `value` into `buf`, returning the number of bytes used.
pub fn encode_uvarint(mut value: u64, buf: &mut [u8; MAX_VARINT_LEN64]) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    i + 1
}

/// Writes the minimal encoding of `value`.
pub fn write_uvarint<W: Write>(writer: &mut W, value: u64) -> io::Result<usize> {
    let mut buf = [0u8; MAX_VARINT_LEN64];
    let n = encode_uvarint(value, &mut buf);
    writer.write_all(&buf[..n])?;
    Ok(n)
}

/// Reads one varint.
///
/// Returns `Ok(None)` if the stream is exhausted before the first byte.
/// Running out of input after the first byte is a truncation error.
pub fn read_uvarint<R: BufRead>(reader: &mut R) -> CodecResult<Option<u64>> {
    let mut value: u64 = 0;
    let mut shift = 0u32;

    for i in 0..MAX_VARINT_LEN64 {
        let byte = match read_byte(reader)? {
            Some(b) => b,
            None if i == 0 => return Ok(None),
            None => return Err(CodecError::TruncatedVarint(i)),
        };

        if byte < 0x80 {
            if i == MAX_VARINT_LEN64 - 1 && byte > 1 {
                return Err(CodecError::VarintOverflow);
            }
            return Ok(Some(value | (u64::from(byte) << shift)));
        }

        value |= u64::from(byte & 0x7f) << shift;
        shift += 7;
    }

    Err(CodecError::VarintOverflow)
}

fn read_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok([]) => return Ok(None),
            Ok(buf) => {
                let byte = buf[0];
                reader.consume(1);
                return Ok(Some(byte));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
