//! End-to-end selection invariants
//!
//! Every output column holds exactly the source records whose row key
//! is in the identifier set, in source order, for every bucket.

mod fixtures;

use std::fs;

use colselect::config::{column_path, dtypes_path, ColumnTypes, DType, DatasetConfig};
use colselect::select::{run_selection, SelectErrorCode};
use fixtures::{pseudo_random, read_fixed, read_u32s, read_u64s, read_uvarints, Column, Dataset};

#[test]
fn test_selects_matching_rows_across_column_types() {
    let ds = Dataset::new(1);
    ds.write_bucket(
        0,
        &[
            ("id", Column::U64(vec![1, 3, 5, 7, 7, 10])),
            ("age", Column::U32(vec![10, 20, 30, 40, 50, 60])),
            ("dx", Column::Uvarint(vec![300, 1, 4, 128, 9999, 2])),
        ],
    );
    ds.write_ids(&[9, 7, 3]);

    let summary = run_selection(&ds.options()).unwrap();
    assert_eq!(summary.partitions, 1);
    assert_eq!(summary.identifiers, 3);
    assert_eq!(summary.metrics.rows_scanned, 6);
    assert_eq!(summary.metrics.rows_selected, 3);
    assert_eq!(summary.metrics.columns_written, 3);

    assert_eq!(read_u64s(&ds.target_column(0, "id")), vec![3, 7, 7]);
    assert_eq!(read_u32s(&ds.target_column(0, "age")), vec![20, 40, 50]);
    assert_eq!(read_uvarints(&ds.target_column(0, "dx")), vec![1, 128, 9999]);
}

#[test]
fn test_target_layout_mirrors_source() {
    let ds = Dataset::new(2);
    for bucket in 0..2 {
        ds.write_bucket(
            bucket,
            &[
                ("id", Column::U64(vec![1, 2])),
                ("sex", Column::U8(vec![0, 1])),
            ],
        );
    }
    ds.write_ids(&[2]);

    run_selection(&ds.options()).unwrap();

    for bucket in 0..2 {
        let source = ColumnTypes::load(&dtypes_path(&ds.source, bucket)).unwrap();
        let target = ColumnTypes::load(&dtypes_path(&ds.target, bucket)).unwrap();
        assert_eq!(source, target);
    }

    let config = DatasetConfig::load(&ds.target).unwrap();
    assert_eq!(config.num_buckets, 2);
    assert_eq!(config.compression, "snappy");
    assert_eq!(config.codes_path(), ds.target.join("Codes"));

    let copied = fs::read_to_string(ds.target.join("Codes").join("DxCodes.json")).unwrap();
    assert_eq!(copied, r#"{"A01":1,"B02":2}"#);
    assert!(ds.target.join("Codes").join("CodeFiles.json").is_file());
}

#[test]
fn test_many_buckets_preserve_order_under_bounded_concurrency() {
    let buckets = 9;
    let rows = 500;
    let ds = Dataset::new(buckets);

    let mut expected = Vec::new();
    for bucket in 0..buckets {
        let keys: Vec<u64> = pseudo_random(bucket as u64 + 1, rows)
            .into_iter()
            .map(|v| v % 50)
            .collect();
        let payload: Vec<u64> = pseudo_random(bucket as u64 + 100, rows);
        let wide: Vec<u16> = (0..rows).map(|i| (i * 7) as u16).collect();

        let picked: Vec<(u64, u64, u16)> = keys
            .iter()
            .zip(&payload)
            .zip(&wide)
            .filter(|((k, _), _)| *k % 3 == 0)
            .map(|((k, p), w)| (*k, *p, *w))
            .collect();
        expected.push(picked);

        ds.write_bucket(
            bucket,
            &[
                ("id", Column::U64(keys)),
                ("payload", Column::Uvarint(payload)),
                ("wide", Column::U16(wide)),
            ],
        );
    }
    let ids: Vec<u64> = (0..50).filter(|k| k % 3 == 0).collect();
    ds.write_ids(&ids);

    let summary = run_selection(&ds.options().with_concurrency(3)).unwrap();
    assert_eq!(summary.partitions, buckets);
    assert!(summary.peak_concurrency >= 1);
    assert!(summary.peak_concurrency <= 3);

    for (bucket, picked) in expected.iter().enumerate() {
        let keys: Vec<u64> = picked.iter().map(|(k, _, _)| *k).collect();
        let payload: Vec<u64> = picked.iter().map(|(_, p, _)| *p).collect();
        let wide: Vec<Vec<u8>> = picked
            .iter()
            .map(|(_, _, w)| w.to_le_bytes().to_vec())
            .collect();

        assert_eq!(read_u64s(&ds.target_column(bucket, "id")), keys);
        assert_eq!(read_uvarints(&ds.target_column(bucket, "payload")), payload);
        assert_eq!(read_fixed(&ds.target_column(bucket, "wide"), 2), wide);
    }
}

#[test]
fn test_empty_identifier_set_yields_empty_columns() {
    let ds = Dataset::new(1);
    ds.write_bucket(
        0,
        &[
            ("id", Column::U64(vec![4, 5, 6])),
            ("score", Column::F32(vec![1.5, 2.5, 3.5])),
        ],
    );
    ds.write_ids(&[]);

    let summary = run_selection(&ds.options()).unwrap();
    assert_eq!(summary.metrics.rows_selected, 0);

    assert!(read_u64s(&ds.target_column(0, "id")).is_empty());
    assert!(read_fixed(&ds.target_column(0, "score"), 4).is_empty());
    assert!(dtypes_path(&ds.target, 0).is_file());
}

#[test]
fn test_float_records_pass_through_bit_exact() {
    let values = vec![0.1, -0.0, f64::MAX, f64::NAN, 42.0];
    let ds = Dataset::new(1);
    ds.write_bucket(
        0,
        &[
            ("id", Column::U64(vec![1, 2, 3, 4, 5])),
            ("weight", Column::F64(values.clone())),
        ],
    );
    ds.write_ids(&[2, 3, 4]);

    run_selection(&ds.options()).unwrap();

    let expected: Vec<Vec<u8>> = values[1..4]
        .iter()
        .map(|v| v.to_le_bytes().to_vec())
        .collect();
    assert_eq!(read_fixed(&ds.target_column(0, "weight"), 8), expected);
}

#[test]
fn test_varint_column_is_rejected_without_output() {
    let ds = Dataset::new(1);
    ds.write_bucket(
        0,
        &[
            ("id", Column::U64(vec![1, 2])),
            ("zdelta", Column::Varint(vec![5, 6])),
        ],
    );
    ds.write_ids(&[1]);

    let err = run_selection(&ds.options()).unwrap_err();
    assert_eq!(err.code(), SelectErrorCode::UnsupportedType);
    assert!(err.to_string().contains("zdelta"));
    assert!(!ds.target_column(0, "zdelta").exists());
}

#[test]
fn test_short_column_is_a_desync() {
    let ds = Dataset::new(1);
    ds.write_bucket(
        0,
        &[
            ("id", Column::U64(vec![1, 2, 3, 4])),
            ("score", Column::U32(vec![1, 2])),
        ],
    );
    ds.write_ids(&[4]);

    let err = run_selection(&ds.options()).unwrap_err();
    assert_eq!(err.code(), SelectErrorCode::StreamDesync);
}

#[test]
fn test_long_column_is_a_desync() {
    let ds = Dataset::new(1);
    ds.write_bucket(
        0,
        &[
            ("id", Column::U64(vec![1, 2])),
            ("score", Column::Uvarint(vec![1, 2, 3])),
        ],
    );
    ds.write_ids(&[1]);

    let err = run_selection(&ds.options()).unwrap_err();
    assert_eq!(err.code(), SelectErrorCode::StreamDesync);
}

#[test]
fn test_corrupt_key_stream_is_reported() {
    let ds = Dataset::new(1);
    ds.write_bucket(0, &[("id", Column::U64(vec![1, 2]))]);
    fs::write(column_path(&ds.source, 0, "id"), b"this is not a snappy frame").unwrap();
    ds.write_ids(&[1]);

    let err = run_selection(&ds.options()).unwrap_err();
    assert_eq!(err.code(), SelectErrorCode::StreamCorrupt);
}

#[test]
fn test_failed_partition_aborts_run() {
    let ds = Dataset::new(4);
    for bucket in 0..4 {
        ds.write_bucket(bucket, &[("id", Column::U64(vec![1, 2, 3]))]);
    }
    ds.write_bucket(
        2,
        &[
            ("id", Column::U64(vec![1, 2, 3])),
            ("bad", Column::U8(vec![1])),
        ],
    );
    ds.write_ids(&[3]);

    let err = run_selection(&ds.options().with_concurrency(1)).unwrap_err();
    assert_eq!(err.code(), SelectErrorCode::StreamDesync);

    let events: Vec<String> = ds
        .log_lines()
        .iter()
        .map(|line| line["event"].as_str().unwrap().to_string())
        .collect();
    assert!(events.contains(&"PARTITION_FAILED".to_string()));
    assert_eq!(events.last().unwrap(), "RUN_ABORTED");
    assert!(!events.contains(&"RUN_COMPLETE".to_string()));
}

#[test]
fn test_replace_rerun_is_value_identical() {
    let ds = Dataset::new(2);
    for bucket in 0..2 {
        ds.write_bucket(
            bucket,
            &[
                ("id", Column::U64(vec![5, 6, 7, 5])),
                ("visits", Column::Uvarint(vec![10, 20, 30, 40])),
            ],
        );
    }
    ds.write_ids(&[5]);

    run_selection(&ds.options()).unwrap();
    let first: Vec<Vec<u64>> = (0..2)
        .map(|b| read_uvarints(&ds.target_column(b, "visits")))
        .collect();

    let err = run_selection(&ds.options()).unwrap_err();
    assert_eq!(err.code(), SelectErrorCode::PreflightFailed);

    run_selection(&ds.options().with_replace(true)).unwrap();
    let second: Vec<Vec<u64>> = (0..2)
        .map(|b| read_uvarints(&ds.target_column(b, "visits")))
        .collect();

    assert_eq!(first, vec![vec![10, 40], vec![10, 40]]);
    assert_eq!(first, second);
}

#[test]
fn test_run_log_records_lifecycle() {
    let ds = Dataset::new(2);
    for bucket in 0..2 {
        ds.write_bucket(bucket, &[("id", Column::U64(vec![1, 2, 3]))]);
    }
    ds.write_ids(&[1, 3]);

    let summary = run_selection(&ds.options()).unwrap();
    let lines = ds.log_lines();

    assert!(lines
        .iter()
        .all(|line| line["run"].as_str() == Some(summary.run_id.as_str())));

    let events: Vec<&str> = lines
        .iter()
        .map(|line| line["event"].as_str().unwrap())
        .collect();
    assert_eq!(events.first(), Some(&"RUN_START"));
    assert_eq!(events.last(), Some(&"RUN_COMPLETE"));
    assert_eq!(events.iter().filter(|e| **e == "MASK_BUILT").count(), 2);
    assert_eq!(events.iter().filter(|e| **e == "PARTITION_COMPLETE").count(), 2);
    assert!(events.contains(&"CODES_COPIED"));
    assert!(events.contains(&"TARGET_PREPARED"));

    let complete = lines.last().unwrap();
    assert_eq!(complete["rows_selected"], "4");
}

#[test]
fn test_key_column_type_is_not_checked_against_width() {
    // The key stream is always read as little-endian u64, so an 8-byte
    // float key is reinterpreted rather than rejected.
    let ds = Dataset::new(1);
    ds.write_bucket(0, &[("id", Column::F64(vec![1.0, 2.0]))]);
    ds.write_ids(&[2.0f64.to_bits()]);

    let summary = run_selection(&ds.options()).unwrap();
    assert_eq!(summary.metrics.rows_selected, 1);
    assert_eq!(
        ColumnTypes::load(&dtypes_path(&ds.target, 0)).unwrap().get("id"),
        Some(DType::Float64)
    );
}
