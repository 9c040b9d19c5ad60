//! Column type tags and per-bucket type metadata (`dtypes.json`)

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};

/// Declared encoding of a column stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    /// LEB128 unsigned integer
    Uvarint,
    /// Signed variable-width integer. Declared, never supported.
    Varint,
}

/// How a column's records are laid out in its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Little-endian records of the given byte width
    FixedWidth(usize),
    /// Self-delimiting unsigned varints
    Uvarint,
    /// Signed varints (unsupported)
    Varint,
}

impl DType {
    /// Returns the tag as it appears in `dtypes.json`
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Uint8 => "uint8",
            DType::Uint16 => "uint16",
            DType::Uint32 => "uint32",
            DType::Uint64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Uvarint => "uvarint",
            DType::Varint => "varint",
        }
    }

    /// Record width in bytes for fixed-width types
    pub fn fixed_width(&self) -> Option<usize> {
        match self.encoding() {
            Encoding::FixedWidth(width) => Some(width),
            Encoding::Uvarint | Encoding::Varint => None,
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            DType::Uint8 => Encoding::FixedWidth(1),
            DType::Uint16 => Encoding::FixedWidth(2),
            DType::Uint32 | DType::Float32 => Encoding::FixedWidth(4),
            DType::Uint64 | DType::Float64 => Encoding::FixedWidth(8),
            DType::Uvarint => Encoding::Uvarint,
            DType::Varint => Encoding::Varint,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column name to type tag mapping for one bucket.
///
/// Iteration order is sorted by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnTypes(BTreeMap<String, DType>);

impl ColumnTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column
    pub fn insert(&mut self, column: impl Into<String>, dtype: DType) {
        self.0.insert(column.into(), dtype);
    }

    pub fn get(&self, column: &str) -> Option<DType> {
        self.0.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates columns in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, DType)> {
        self.0.iter().map(|(name, dtype)| (name.as_str(), *dtype))
    }

    /// Load a `dtypes.json` document.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::from_open(path, e))?;

        serde_json::from_str(&content).map_err(|e| {
            ConfigError::invalid(format!("Invalid type metadata in {}: {}", path.display(), e))
        })
    }

    /// Write a `dtypes.json` document, keys sorted.
    pub fn write(&self, path: &Path) -> ConfigResult<()> {
        let file = File::create(path).map_err(|e| ConfigError::io_error_at_path(path, e))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, self)
            .map_err(|e| ConfigError::invalid(format!("Failed to encode type metadata: {}", e)))?;
        writeln!(writer).map_err(|e| ConfigError::io_error_at_path(path, e))?;
        writer
            .flush()
            .map_err(|e| ConfigError::io_error_at_path(path, e))
    }
}

impl FromIterator<(String, DType)> for ColumnTypes {
    fn from_iter<I: IntoIterator<Item = (String, DType)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ColumnTypes {
    type Item = (&'a String, &'a DType);
    type IntoIter = btree_map::Iter<'a, String, DType>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
