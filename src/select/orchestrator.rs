//! Selection run orchestration
//!
//! Sequence:
//!
//! 1. Preflight: parameters present, source exists, target is not the
//!    source, target absent unless replacing
//! 2. Load source configuration and the identifier set
//! 3. Open the run log
//! 4. Create the target root, copy the label directory, write the
//!    rewritten configuration, create every bucket directory
//! 5. Run every partition through the bounded scheduler
//! 6. Emit the completion record
//!
//! Nothing is written before step 3. From step 4 on, the first error
//! aborts the whole run; the partially written target is left in place.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::config::{bucket_path, buckets_dir, ConfigError, DatasetConfig, CODES_DIR};
use crate::ids::IdentifierSet;
use crate::observability::{Event, MetricsSnapshot, RunLog};

use super::context::{RunContext, RunOptions};
use super::errors::{SelectError, SelectResult};
use super::scheduler::BoundedScheduler;
use super::worker::process_partition;

/// Completion record of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub partitions: usize,
    pub identifiers: usize,
    /// Most partition jobs observed running at once
    pub peak_concurrency: usize,
    pub metrics: MetricsSnapshot,
}

/// Checks every precondition that can be verified without writing.
pub fn preflight(options: &RunOptions) -> SelectResult<()> {
    if options.key_column.trim().is_empty() {
        return Err(SelectError::preflight("Key column name is required"));
    }
    if options.id_file.as_os_str().is_empty()
        || options.target_dir.as_os_str().is_empty()
        || options.source_dir.as_os_str().is_empty()
    {
        return Err(SelectError::preflight(
            "usage: colselect --idvar <name> --idfile <path> --targetdir <path> --sourcedir <path>",
        ));
    }

    if !options.source_dir.is_dir() {
        return Err(SelectError::preflight(format!(
            "Source directory does not exist: {}",
            options.source_dir.display()
        )));
    }

    if same_location(&options.target_dir, &options.source_dir) {
        return Err(SelectError::preflight(
            "Cannot have targetdir equal to sourcedir",
        ));
    }

    if !options.replace && options.target_dir.symlink_metadata().is_ok() {
        return Err(SelectError::preflight(format!(
            "Use --replace to overwrite existing contents of {}",
            options.target_dir.display()
        )));
    }

    Ok(())
}

/// True if both paths name the same filesystem location.
///
/// Existing paths are compared after canonicalization; otherwise the
/// paths are compared as given.
fn same_location(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Runs a complete selection.
pub fn run_selection(options: &RunOptions) -> SelectResult<RunSummary> {
    preflight(options)?;

    let config = DatasetConfig::load(&options.source_dir)?;
    let codes_source = config.codes_path();
    if !codes_source.is_dir() {
        return Err(SelectError::from(ConfigError::invalid(format!(
            "CodesDir is not a directory: {}",
            codes_source.display()
        ))));
    }
    let ids = IdentifierSet::load(&options.id_file)?;

    let log = RunLog::create(&options.log_file)
        .map_err(|e| SelectError::io_error_at_path(&options.log_file, e))?;

    let ctx = RunContext::new(
        &options.source_dir,
        &options.target_dir,
        &options.key_column,
        ids,
        config,
        log,
    );

    match execute(&ctx, options.concurrency) {
        Ok(summary) => Ok(summary),
        Err(err) => {
            ctx.log().event(
                Event::RunAborted,
                &[
                    ("code", err.code().code()),
                    ("reason", err.to_string().as_str()),
                ],
            );
            Err(err)
        }
    }
}

fn execute(ctx: &RunContext, concurrency: usize) -> SelectResult<RunSummary> {
    let log = ctx.log();
    let config = ctx.config();

    let source = ctx.source_dir().display().to_string();
    let target = ctx.target_dir().display().to_string();
    log.event(
        Event::RunStart,
        &[
            ("key_column", ctx.key_column()),
            ("source", source.as_str()),
            ("target", target.as_str()),
        ],
    );
    log.event(
        Event::ConfigLoaded,
        &[
            ("buckets", config.num_buckets.to_string().as_str()),
            ("compression", config.compression.as_str()),
        ],
    );
    log.event(
        Event::IdsLoaded,
        &[("count", ctx.ids().len().to_string().as_str())],
    );

    prepare_target(ctx)?;

    let scheduler = BoundedScheduler::new(concurrency);
    let reports = scheduler.run(0..config.num_buckets, |bucket| {
        process_partition(ctx, bucket).map_err(|err| {
            log.event(
                Event::PartitionFailed,
                &[
                    ("bucket", bucket.to_string().as_str()),
                    ("reason", err.to_string().as_str()),
                ],
            );
            err
        })
    })?;

    let summary = RunSummary {
        run_id: log.run_id().to_string(),
        partitions: reports.len(),
        identifiers: ctx.ids().len(),
        peak_concurrency: scheduler.peak_concurrency(),
        metrics: ctx.metrics().snapshot(),
    };

    log.event(
        Event::RunComplete,
        &[
            ("partitions", summary.partitions.to_string().as_str()),
            ("rows_scanned", summary.metrics.rows_scanned.to_string().as_str()),
            ("rows_selected", summary.metrics.rows_selected.to_string().as_str()),
        ],
    );

    Ok(summary)
}

/// Creates the target root, label directory, configuration and buckets.
fn prepare_target(ctx: &RunContext) -> SelectResult<()> {
    let target = ctx.target_dir();
    create_dir_all(target)?;

    let codes_target = target.join(CODES_DIR);
    copy_dir_recursive(&ctx.config().codes_path(), &codes_target)?;
    ctx.log().event(
        Event::CodesCopied,
        &[("path", codes_target.display().to_string().as_str())],
    );

    ctx.config().with_codes_dir(&codes_target).write(target)?;

    create_dir_all(&buckets_dir(target))?;
    for bucket in 0..ctx.config().num_buckets {
        create_dir_all(&bucket_path(target, bucket))?;
    }
    ctx.log().event(
        Event::TargetPrepared,
        &[("buckets", ctx.config().num_buckets.to_string().as_str())],
    );

    Ok(())
}

fn create_dir_all(path: &Path) -> SelectResult<()> {
    fs::create_dir_all(path).map_err(|e| SelectError::io_error_at_path(path, e))
}

/// Copy a file byte-for-byte with fsync.
fn copy_file_with_fsync(src: &Path, dst: &Path) -> SelectResult<()> {
    let mut src_file = File::open(src).map_err(|e| SelectError::io_error_at_path(src, e))?;
    let mut dst_file = File::create(dst).map_err(|e| SelectError::io_error_at_path(dst, e))?;

    io::copy(&mut src_file, &mut dst_file).map_err(|e| SelectError::io_error_at_path(dst, e))?;

    dst_file
        .sync_all()
        .map_err(|e| SelectError::io_error_at_path(dst, e))
}

/// Recursively copy a directory, preserving file names.
fn copy_dir_recursive(src: &Path, dst: &Path) -> SelectResult<()> {
    create_dir_all(dst)?;

    let entries = fs::read_dir(src).map_err(|e| SelectError::io_error_at_path(src, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| SelectError::io_error_at_path(src, e))?;

        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else if src_path.is_file() {
            copy_file_with_fsync(&src_path, &dst_path)?;
        }
        // Skip symlinks and other file types
    }

    Ok(())
}
