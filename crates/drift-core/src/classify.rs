//! Change classification against recorded history
//!
//! Decides which of the five statuses applies to a path by comparing its
//! current content checksum with the prior record, using a prefix checksum
//! to separate "appended to" from "modified" without diffing.

use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use tracing::debug;

use crate::hash::{checksum_file, ChecksumError};
use crate::record::{FileRecord, FileStatus, History};

/// Classify `path` against the prior history.
///
/// Returns a complete replacement record for the path. With `ignore_mtime`
/// set, a file whose mtime matches its prior record is not rehashed: the
/// prior size/checksum/mtime are carried forward verbatim under the
/// `ignored (mtime unchanged)` status. That trusts mtime as a proxy for
/// content — a file rewritten with its mtime restored goes undetected.
///
/// I/O failures while hashing propagate; the caller decides whether the run
/// continues.
pub fn classify(
    path: &Path,
    ignore_mtime: bool,
    history: &History,
) -> Result<FileRecord, ChecksumError> {
    // Non-files (directories, dangling symlinks, special files) are recorded
    // and skipped without any further work. Stat failures land here too.
    let meta = match fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta,
        _ => return Ok(FileRecord::not_a_file()),
    };

    let size = meta.len();
    let mtime = mtime_seconds(&meta);

    let key = path.display().to_string();
    let prior = history.get(&key).filter(|record| record.is_usable_prior());

    let Some(prior) = prior else {
        let checksum = checksum_file(path, None)?;
        debug!(path = %key, "no usable prior record");
        return Ok(FileRecord::measured(FileStatus::New, size, checksum, mtime));
    };

    if ignore_mtime && prior.mtime == Some(mtime) {
        debug!(path = %key, "mtime unchanged, skipping rehash");
        return Ok(FileRecord {
            status: FileStatus::MtimeUnchanged,
            size: prior.size,
            checksum: prior.checksum,
            mtime: prior.mtime,
        });
    }

    let checksum = checksum_file(path, None)?;
    let status = if prior.checksum == Some(checksum) {
        FileStatus::Unchanged
    } else if prefix_matches_prior(path, prior, size)? {
        FileStatus::Appended
    } else {
        FileStatus::Modified
    };

    debug!(path = %key, status = %status, "classified");
    Ok(FileRecord::measured(status, size, checksum, mtime))
}

/// The append hypothesis: do the first `prior.size` bytes still hash to the
/// prior checksum?
///
/// A prior size larger than the current file fails outright, so truncation
/// can never read as an append. A short read (the file shrank between stat
/// and read) also counts as a failed hypothesis rather than an error: the
/// content demonstrably differs.
fn prefix_matches_prior(
    path: &Path,
    prior: &FileRecord,
    current_size: u64,
) -> Result<bool, ChecksumError> {
    let (Some(prior_size), Some(prior_checksum)) = (prior.size, prior.checksum) else {
        return Ok(false);
    };
    if prior_size > current_size {
        return Ok(false);
    }
    match checksum_file(path, Some(prior_size)) {
        Ok(prefix) => Ok(prefix == prior_checksum),
        Err(ChecksumError::ShortRead { .. }) => Ok(false),
        Err(err) => Err(err),
    }
}

fn mtime_seconds(meta: &fs::Metadata) -> f64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
