//! Dataset fixtures for selection tests
//!
//! Builds real bucketed datasets on disk:
//! - conf.json at the root
//! - a Codes directory with label documents
//! - per bucket: dtypes.json plus one framed-snappy stream per column

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use colselect::codec::{ColumnReader, ColumnWriter};
use colselect::config::{bucket_path, column_path, dtypes_path, ColumnTypes, DType, DatasetConfig};
use colselect::select::RunOptions;
use tempfile::TempDir;

/// Column contents to write into a bucket
#[derive(Debug, Clone)]
pub enum Column {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Uvarint(Vec<u64>),
    /// Written as uvarints; only the declared tag matters
    Varint(Vec<u64>),
}

impl Column {
    pub fn dtype(&self) -> DType {
        match self {
            Column::U8(_) => DType::Uint8,
            Column::U16(_) => DType::Uint16,
            Column::U32(_) => DType::Uint32,
            Column::U64(_) => DType::Uint64,
            Column::F32(_) => DType::Float32,
            Column::F64(_) => DType::Float64,
            Column::Uvarint(_) => DType::Uvarint,
            Column::Varint(_) => DType::Varint,
        }
    }

    /// Raw records of the column, one byte vector per row
    pub fn records(&self) -> Vec<Vec<u8>> {
        match self {
            Column::U8(v) => v.iter().map(|x| x.to_le_bytes().to_vec()).collect(),
            Column::U16(v) => v.iter().map(|x| x.to_le_bytes().to_vec()).collect(),
            Column::U32(v) => v.iter().map(|x| x.to_le_bytes().to_vec()).collect(),
            Column::U64(v) => v.iter().map(|x| x.to_le_bytes().to_vec()).collect(),
            Column::F32(v) => v.iter().map(|x| x.to_le_bytes().to_vec()).collect(),
            Column::F64(v) => v.iter().map(|x| x.to_le_bytes().to_vec()).collect(),
            Column::Uvarint(v) | Column::Varint(v) => {
                v.iter().map(|x| x.to_le_bytes().to_vec()).collect()
            }
        }
    }

    pub fn write(&self, path: &Path) {
        let mut writer = ColumnWriter::create(path).unwrap();
        match self {
            Column::Uvarint(values) | Column::Varint(values) => {
                for v in values {
                    writer.write_uvarint(*v).unwrap();
                }
            }
            _ => {
                for record in self.records() {
                    writer.write_fixed(&record).unwrap();
                }
            }
        }
        writer.finish_file().unwrap();
    }
}

/// A source dataset plus the paths a run needs
pub struct Dataset {
    pub dir: TempDir,
    pub source: PathBuf,
    pub target: PathBuf,
    pub id_file: PathBuf,
    pub log_file: PathBuf,
    pub num_buckets: usize,
}

impl Dataset {
    /// Creates the source root with `num_buckets` empty bucket directories.
    pub fn new(num_buckets: usize) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let source = dir.path().join("full");
        let target = dir.path().join("selected");
        let id_file = dir.path().join("ids.txt");
        let log_file = dir.path().join("select.log");

        let codes = source.join("Codes");
        fs::create_dir_all(&codes).unwrap();
        fs::write(codes.join("CodeFiles.json"), r#"{"dx1":"Dx","dx2":"Dx"}"#).unwrap();
        fs::write(codes.join("DxCodes.json"), r#"{"A01":1,"B02":2}"#).unwrap();

        for bucket in 0..num_buckets {
            fs::create_dir_all(bucket_path(&source, bucket)).unwrap();
        }

        let config = DatasetConfig {
            num_buckets,
            compression: "snappy".to_string(),
            codes_dir: codes.to_string_lossy().into_owned(),
        };
        config.write(&source).unwrap();

        fs::write(&id_file, "").unwrap();

        Self {
            dir,
            source,
            target,
            id_file,
            log_file,
            num_buckets,
        }
    }

    /// Writes the columns and type metadata of one bucket.
    pub fn write_bucket(&self, bucket: usize, columns: &[(&str, Column)]) {
        let types: ColumnTypes = columns
            .iter()
            .map(|(name, column)| (name.to_string(), column.dtype()))
            .collect();
        types.write(&dtypes_path(&self.source, bucket)).unwrap();

        for (name, column) in columns {
            column.write(&column_path(&self.source, bucket, name));
        }
    }

    pub fn write_ids(&self, ids: &[u64]) {
        let text: String = ids.iter().map(|id| format!("{}\n", id)).collect();
        fs::write(&self.id_file, text).unwrap();
    }

    /// Options selecting on column `id` with a small concurrency ceiling
    pub fn options(&self) -> RunOptions {
        RunOptions::new("id", &self.id_file, &self.target, &self.source)
            .with_concurrency(4)
            .with_log_file(&self.log_file)
    }

    pub fn target_column(&self, bucket: usize, column: &str) -> PathBuf {
        column_path(&self.target, bucket, column)
    }

    pub fn log_lines(&self) -> Vec<serde_json::Value> {
        fs::read_to_string(&self.log_file)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

pub fn read_fixed(path: &Path, width: usize) -> Vec<Vec<u8>> {
    let mut reader = ColumnReader::open(path).unwrap();
    let mut out = Vec::new();
    let mut buf = vec![0u8; width];
    while reader.read_fixed(&mut buf).unwrap() {
        out.push(buf.clone());
    }
    out
}

pub fn read_u64s(path: &Path) -> Vec<u64> {
    let mut reader = ColumnReader::open(path).unwrap();
    let mut out = Vec::new();
    while let Some(v) = reader.read_u64().unwrap() {
        out.push(v);
    }
    out
}

pub fn read_u32s(path: &Path) -> Vec<u32> {
    read_fixed(path, 4)
        .into_iter()
        .map(|r| u32::from_le_bytes([r[0], r[1], r[2], r[3]]))
        .collect()
}

pub fn read_uvarints(path: &Path) -> Vec<u64> {
    let mut reader = ColumnReader::open(path).unwrap();
    let mut out = Vec::new();
    while let Some(v) = reader.read_uvarint().unwrap() {
        out.push(v);
    }
    out
}

/// Deterministic pseudo-random sequence (xorshift) for bulk fixtures
pub fn pseudo_random(seed: u64, count: usize) -> Vec<u64> {
    let mut state = seed.max(1);
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        })
        .collect()
}
