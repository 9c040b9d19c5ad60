//! Column transcoding
//!
//! Decodes one column stream record by record, in lockstep with the
//! partition's selection mask, and re-encodes the kept records into a new
//! stream. The input must hold exactly one record per mask position.

use std::io::{Read, Write};

use crate::codec::{ColumnReader, ColumnWriter};
use crate::config::{DType, Encoding};
use crate::observability::Event;

use super::context::RunContext;
use super::errors::{SelectError, SelectResult};
use super::mask::SelectionMask;

/// Outcome of one column transcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnReport {
    /// Records written
    pub records: u64,
    /// Uncompressed bytes written
    pub bytes: u64,
}

/// Copies fixed-width records whose mask entry is set.
///
/// Dropped records are still consumed so the stream stays aligned.
pub fn transcode_fixed_width<R: Read, W: Write>(
    reader: &mut ColumnReader<R>,
    writer: &mut ColumnWriter<W>,
    width: usize,
    mask: &SelectionMask,
) -> SelectResult<()> {
    let mut record = vec![0u8; width];

    for (row, keep) in mask.iter().enumerate() {
        if !reader.read_fixed(&mut record)? {
            return Err(short_stream(row, mask));
        }
        if keep {
            writer.write_fixed(&record)?;
        }
    }

    ensure_exhausted(reader, mask)
}

/// Re-encodes varints whose mask entry is set.
///
/// Output is value-identical to the input; the encoding is always minimal.
pub fn transcode_uvarint<R: Read, W: Write>(
    reader: &mut ColumnReader<R>,
    writer: &mut ColumnWriter<W>,
    mask: &SelectionMask,
) -> SelectResult<()> {
    for (row, keep) in mask.iter().enumerate() {
        let value = match reader.read_uvarint()? {
            Some(value) => value,
            None => return Err(short_stream(row, mask)),
        };
        if keep {
            writer.write_uvarint(value)?;
        }
    }

    ensure_exhausted(reader, mask)
}

fn short_stream(row: usize, mask: &SelectionMask) -> SelectError {
    SelectError::desync(format!(
        "Column stream ended at row {} but the key column has {} rows",
        row,
        mask.len()
    ))
}

fn ensure_exhausted<R: Read>(reader: &mut ColumnReader<R>, mask: &SelectionMask) -> SelectResult<()> {
    if reader.is_exhausted()? {
        Ok(())
    } else {
        Err(SelectError::desync(format!(
            "Column stream has data beyond the key column's {} rows",
            mask.len()
        )))
    }
}

/// Transcodes `column` of `bucket` from the source into the target.
///
/// Unsupported types are rejected before any file is opened.
pub fn transcode_column(
    ctx: &RunContext,
    bucket: usize,
    column: &str,
    dtype: DType,
    mask: &SelectionMask,
) -> SelectResult<ColumnReport> {
    let encoding = dtype.encoding();
    if encoding == Encoding::Varint {
        return Err(SelectError::unsupported_type(column, dtype)
            .with_details(format!("bucket {}", bucket)));
    }

    let source = ctx.source_column(bucket, column);
    let target = ctx.target_column(bucket, column);
    let context = || format!("bucket {}, column {}", bucket, column);

    let mut reader = ColumnReader::open(&source)
        .map_err(|e| SelectError::io_error_at_path(&source, e).with_details(context()))?;
    let mut writer = ColumnWriter::create(&target)
        .map_err(|e| SelectError::io_error_at_path(&target, e).with_details(context()))?;

    let result = match encoding {
        Encoding::FixedWidth(width) => {
            transcode_fixed_width(&mut reader, &mut writer, width, mask)
        }
        Encoding::Uvarint => transcode_uvarint(&mut reader, &mut writer, mask),
        Encoding::Varint => Err(SelectError::unsupported_type(column, dtype)),
    };
    result.map_err(|e| e.with_details(context()))?;

    let report = ColumnReport {
        records: writer.records_written(),
        bytes: writer.bytes_written(),
    };

    // Encoder trailer must reach the file before the handle closes
    writer
        .finish_file()
        .map_err(|e| SelectError::from_codec(e).with_details(context()))?;

    ctx.metrics().add_column(report.bytes);
    ctx.log().event(
        Event::ColumnWritten,
        &[
            ("bucket", bucket.to_string().as_str()),
            ("column", column),
            ("dtype", dtype.as_str()),
            ("records", report.records.to_string().as_str()),
        ],
    );

    Ok(report)
}
