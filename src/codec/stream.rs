//! Framed-snappy column streams
//!
//! Every column file is a snappy frame-format stream of back-to-back
//! records. Nothing in the stream records how many values it holds; the
//! reader reports a clean end only when the stream ends on a record
//! boundary.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use snap::read::FrameDecoder;
use snap::write::FrameEncoder;

use super::errors::{CodecError, CodecResult};
use super::varint::{read_uvarint, write_uvarint};

/// Sequential reader over a decompressed column stream.
pub struct ColumnReader<R: Read> {
    inner: BufReader<FrameDecoder<R>>,
    records_read: u64,
}

impl ColumnReader<File> {
    /// Opens a column file for reading.
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> ColumnReader<R> {
    /// Wraps a compressed byte source.
    pub fn new(source: R) -> Self {
        Self {
            inner: BufReader::new(FrameDecoder::new(source)),
            records_read: 0,
        }
    }

    /// Number of records decoded so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Fills `buf` with the next fixed-width record.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a full record was read
    /// - `Ok(false)` if the stream ended exactly on a record boundary
    /// - `Err(TruncatedRecord)` if the stream ended inside a record
    pub fn read_fixed(&mut self, buf: &mut [u8]) -> CodecResult<bool> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled == 0 && !buf.is_empty() {
            return Ok(false);
        }
        if filled < buf.len() {
            return Err(CodecError::TruncatedRecord {
                expected: buf.len(),
                got: filled,
            });
        }

        self.records_read += 1;
        Ok(true)
    }

    /// Reads the next little-endian u64 record.
    pub fn read_u64(&mut self) -> CodecResult<Option<u64>> {
        let mut buf = [0u8; 8];
        if self.read_fixed(&mut buf)? {
            Ok(Some(u64::from_le_bytes(buf)))
        } else {
            Ok(None)
        }
    }

    /// Reads the next varint record.
    pub fn read_uvarint(&mut self) -> CodecResult<Option<u64>> {
        let value = read_uvarint(&mut self.inner)?;
        if value.is_some() {
            self.records_read += 1;
        }
        Ok(value)
    }

    /// Returns true if no decompressed bytes remain.
    pub fn is_exhausted(&mut self) -> CodecResult<bool> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.is_empty()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Writer producing a framed-snappy column stream.
///
/// The stream is only readable once [`ColumnWriter::finish`] has flushed
/// the encoder. Dropping the writer without finishing it loses the
/// buffered tail.
pub struct ColumnWriter<W: Write> {
    encoder: FrameEncoder<W>,
    records_written: u64,
    bytes_written: u64,
}

impl ColumnWriter<File> {
    /// Creates (or truncates) a column file.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::create(path)?))
    }

    /// Finalizes the stream and fsyncs the file.
    ///
    /// The encoder is flushed before the file handle is synced and closed.
    pub fn finish_file(self) -> CodecResult<()> {
        let file = self.finish()?;
        file.sync_all()?;
        Ok(())
    }
}

impl<W: Write> ColumnWriter<W> {
    /// Wraps an output sink.
    pub fn new(sink: W) -> Self {
        Self {
            encoder: FrameEncoder::new(sink),
            records_written: 0,
            bytes_written: 0,
        }
    }

    /// Appends one fixed-width record verbatim.
    pub fn write_fixed(&mut self, record: &[u8]) -> CodecResult<()> {
        self.encoder.write_all(record)?;
        self.records_written += 1;
        self.bytes_written += record.len() as u64;
        Ok(())
    }

    /// Appends one varint record in minimal encoding.
    pub fn write_uvarint(&mut self, value: u64) -> CodecResult<()> {
        let n = write_uvarint(&mut self.encoder, value)?;
        self.records_written += 1;
        self.bytes_written += n as u64;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Uncompressed bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes the final frame and returns the underlying sink.
    pub fn finish(mut self) -> CodecResult<W> {
        self.encoder.flush()?;
        self.encoder
            .into_inner()
            .map_err(|e| CodecError::Finalize(e.error().to_string()))
    }
}
