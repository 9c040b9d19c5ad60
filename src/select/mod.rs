//! Selection engine
//!
//! Produces a copy of a bucketed dataset holding only the rows whose key
//! column value is in an identifier set.
//!
//! # Flow
//!
//! - The orchestrator validates inputs, prepares the target and builds a
//!   [`RunContext`]
//! - The [`BoundedScheduler`] runs one partition job per bucket, at most
//!   `concurrency` at a time
//! - Each job builds one [`SelectionMask`] from the key column and
//!   transcodes every column against it
//!
//! # Invariants
//!
//! - Mask length equals the key column's row count
//! - Every output column holds exactly the mask's selected rows
//! - Output row order is source row order
//! - Any error aborts the run

mod context;
mod errors;
mod mask;
mod orchestrator;
mod scheduler;
mod transcode;
mod worker;

pub use context::{RunContext, RunOptions, DEFAULT_CONCURRENCY, DEFAULT_LOG_FILE};
pub use errors::{SelectError, SelectErrorCode, SelectResult, Severity};
pub use mask::{build_mask, SelectionMask};
pub use orchestrator::{preflight, run_selection, RunSummary};
pub use scheduler::BoundedScheduler;
pub use transcode::{transcode_column, transcode_fixed_width, transcode_uvarint, ColumnReport};
pub use worker::{process_partition, PartitionReport};
