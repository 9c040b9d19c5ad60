//! Selection mask construction
//!
//! The key column is always read as 8-byte little-endian unsigned
//! integers, whatever its declared type. End of stream terminates the
//! scan; any other decode failure is fatal.

use std::io::Read;

use crate::codec::{CodecResult, ColumnReader};
use crate::ids::IdentifierSet;
use crate::observability::Event;

use super::context::RunContext;
use super::errors::{SelectError, SelectResult};

/// Row-aligned keep/drop flags for one partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMask {
    rows: Vec<bool>,
    selected: usize,
}

impl SelectionMask {
    /// Scans a key column to its end, testing each value for membership.
    pub fn from_key_column<R: Read>(
        reader: &mut ColumnReader<R>,
        ids: &IdentifierSet,
    ) -> CodecResult<Self> {
        let mut mask = Self::default();
        while let Some(value) = reader.read_u64()? {
            mask.push(ids.contains(value));
        }
        Ok(mask)
    }

    fn push(&mut self, keep: bool) {
        if keep {
            self.selected += 1;
        }
        self.rows.push(keep);
    }

    /// Number of rows in the partition
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows kept
    pub fn selected_count(&self) -> usize {
        self.selected
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.rows.iter().copied()
    }
}

impl FromIterator<bool> for SelectionMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut mask = Self::default();
        for keep in iter {
            mask.push(keep);
        }
        mask
    }
}

/// Builds the mask of `bucket` from its key column.
pub fn build_mask(ctx: &RunContext, bucket: usize) -> SelectResult<SelectionMask> {
    let path = ctx.source_column(bucket, ctx.key_column());
    let mut reader =
        ColumnReader::open(&path).map_err(|e| SelectError::io_error_at_path(&path, e))?;

    let mask = SelectionMask::from_key_column(&mut reader, ctx.ids()).map_err(|e| {
        SelectError::from_codec(e).with_details(format!(
            "bucket {}, key column {}",
            bucket,
            path.display()
        ))
    })?;

    ctx.metrics()
        .add_rows(mask.len() as u64, mask.selected_count() as u64);
    ctx.log().event(
        Event::MaskBuilt,
        &[
            ("bucket", bucket.to_string().as_str()),
            ("rows", mask.len().to_string().as_str()),
            ("selected", mask.selected_count().to_string().as_str()),
        ],
    );

    Ok(mask)
}
