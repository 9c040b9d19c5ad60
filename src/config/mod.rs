//! Dataset configuration and type metadata
//!
//! A dataset root carries a `conf.json` record and one `dtypes.json`
//! per bucket. Both are JSON documents read with serde.

mod dataset;
mod dtype;
mod errors;
mod layout;

pub use dataset::DatasetConfig;
pub use dtype::{ColumnTypes, DType, Encoding};
pub use errors::{ConfigError, ConfigErrorCode, ConfigResult};
pub use layout::{
    bucket_path, buckets_dir, column_path, config_path, dtypes_path, BUCKETS_DIR, CODES_DIR,
    COLUMN_SUFFIX, CONFIG_FILE, DTYPES_FILE,
};
