//! Per-partition unit of work
//!
//! 1. Load the partition's type metadata
//! 2. Write it unchanged into the target partition
//! 3. Build the selection mask from the key column
//! 4. Transcode every declared column against that mask
//!
//! Columns are processed sequentially in name order. Any failure is
//! returned immediately and aborts the run.

use crate::config::ColumnTypes;
use crate::observability::Event;

use super::context::RunContext;
use super::errors::{SelectError, SelectResult};
use super::mask::build_mask;
use super::transcode::transcode_column;

/// Outcome of one partition job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionReport {
    pub bucket: usize,
    /// Rows in the key column
    pub rows_scanned: usize,
    /// Rows kept in every output column
    pub rows_selected: usize,
    /// Column files written
    pub columns: usize,
}

/// Runs the selection for one bucket.
pub fn process_partition(ctx: &RunContext, bucket: usize) -> SelectResult<PartitionReport> {
    let bucket_field = bucket.to_string();
    ctx.log()
        .event(Event::PartitionStart, &[("bucket", bucket_field.as_str())]);

    let dtypes = ColumnTypes::load(&ctx.source_dtypes(bucket))
        .map_err(|e| SelectError::from(e).with_details(format!("bucket {}", bucket)))?;
    dtypes
        .write(&ctx.target_dtypes(bucket))
        .map_err(|e| SelectError::from(e).with_details(format!("bucket {}", bucket)))?;

    let mask = build_mask(ctx, bucket)?;

    for (column, dtype) in dtypes.iter() {
        let report = transcode_column(ctx, bucket, column, dtype, &mask)?;
        debug_assert_eq!(report.records, mask.selected_count() as u64);
    }

    ctx.metrics().increment_partitions();
    ctx.log().event(
        Event::PartitionComplete,
        &[
            ("bucket", bucket_field.as_str()),
            ("columns", dtypes.len().to_string().as_str()),
        ],
    );

    Ok(PartitionReport {
        bucket,
        rows_scanned: mask.len(),
        rows_selected: mask.selected_count(),
        columns: dtypes.len(),
    })
}
