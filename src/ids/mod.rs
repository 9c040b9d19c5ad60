//! Identifier set
//!
//! The sorted collection of key values whose rows are kept. Loaded once
//! per run and shared read-only by every partition job.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading an identifier file
#[derive(Debug, Error)]
pub enum IdsError {
    #[error("Failed to read identifier file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid identifier on line {line}: {text:?}")]
    Parse { line: usize, text: String },
}

/// Result type for identifier loading
pub type IdsResult<T> = Result<T, IdsError>;

/// Immutable, ascending sequence of identifiers.
///
/// Duplicates are kept; they do not change membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    ids: Vec<u64>,
}

impl IdentifierSet {
    /// Builds a set from arbitrary values.
    pub fn from_values(mut ids: Vec<u64>) -> Self {
        ids.sort_unstable();
        Self { ids }
    }

    /// Loads one unsigned integer per line.
    ///
    /// Surrounding whitespace is ignored. Any other content on a line,
    /// including an empty line, is a parse error.
    pub fn load(path: &Path) -> IdsResult<Self> {
        let io_err = |source| IdsError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            IdsError::Io { source, .. } => io_err(source),
            other => other,
        })
    }

    /// Parses identifiers from any line-oriented source.
    pub fn from_reader<R: BufRead>(reader: R) -> IdsResult<Self> {
        let mut ids = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| IdsError::Io {
                path: PathBuf::new(),
                source,
            })?;
            let text = line.trim();
            let id = text.parse::<u64>().map_err(|_| IdsError::Parse {
                line: index + 1,
                text: line.clone(),
            })?;
            ids.push(id);
        }

        Ok(Self::from_values(ids))
    }

    /// Exact membership test by binary search.
    ///
    /// Finds the first element not less than `value` and reports whether
    /// it equals `value`.
    pub fn contains(&self, value: u64) -> bool {
        let index = self.ids.partition_point(|&id| id < value);
        index < self.ids.len() && self.ids[index] == value
    }

    /// Number of identifiers, duplicates included
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.ids
    }
}
