//! On-disk layout of a bucketed dataset
//!
//! ```text
//! <root>/conf.json
//! <root>/Codes/...
//! <root>/Buckets/0000/dtypes.json
//! <root>/Buckets/0000/<column>.bin.sz
//! ```

use std::path::{Path, PathBuf};

/// Dataset configuration document name
pub const CONFIG_FILE: &str = "conf.json";

/// Per-bucket type metadata document name
pub const DTYPES_FILE: &str = "dtypes.json";

/// Directory holding all buckets
pub const BUCKETS_DIR: &str = "Buckets";

/// Label directory name inside a dataset root
pub const CODES_DIR: &str = "Codes";

/// Suffix of a column stream file
pub const COLUMN_SUFFIX: &str = ".bin.sz";

/// Returns `<root>/Buckets`.
pub fn buckets_dir(root: &Path) -> PathBuf {
    root.join(BUCKETS_DIR)
}

/// Returns the directory of the given bucket, zero-padded to four digits.
pub fn bucket_path(root: &Path, bucket: usize) -> PathBuf {
    buckets_dir(root).join(format!("{:04}", bucket))
}

/// Returns the stream file of `column` in `bucket`.
pub fn column_path(root: &Path, bucket: usize, column: &str) -> PathBuf {
    bucket_path(root, bucket).join(format!("{}{}", column, COLUMN_SUFFIX))
}

/// Returns the type metadata document of `bucket`.
pub fn dtypes_path(root: &Path, bucket: usize) -> PathBuf {
    bucket_path(root, bucket).join(DTYPES_FILE)
}

/// Returns the configuration document of a dataset root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}
