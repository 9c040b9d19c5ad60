//! colselect - Row selection for partitioned, compressed columnar datasets
//!
//! Copies a bucketed dataset, keeping only the rows whose key column value
//! belongs to a given identifier set. Column encodings and row order are
//! preserved.

pub mod cli;
pub mod codec;
pub mod config;
pub mod ids;
pub mod observability;
pub mod select;
