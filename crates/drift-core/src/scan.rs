//! Directory scan orchestration
//!
//! Walks a directory in sorted order, classifies every glob-matched entry
//! against the prior history, then synthesizes `removed` records for prior
//! paths the walk no longer found. Single-threaded; each file is fully
//! classified before the next is considered.

use std::path::Path;

use globset::GlobBuilder;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::classify::classify;
use crate::hash::ChecksumError;
use crate::record::{FileRecord, FileStatus, History};

/// Per-run scan configuration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Glob selecting entries beneath the scanned directory. `*` is a
    /// single path component, so the default stays non-recursive; patterns
    /// like `**/*.log` opt into recursion.
    pub pattern: String,
    /// Skip rehashing files whose mtime matches the prior record
    pub ignore_mtime: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            pattern: "*".to_string(),
            ignore_mtime: false,
        }
    }
}

/// Errors that abort a scan before any file is classified
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("invalid glob pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// One file whose classification failed mid-scan
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: ChecksumError,
}

/// Result of a completed scan: the replacement history plus any per-file
/// failures encountered along the way
#[derive(Debug)]
pub struct ScanSummary {
    pub history: History,
    pub failures: Vec<FileFailure>,
}

impl ScanSummary {
    /// Entry counts per status, zero-count statuses omitted
    pub fn status_counts(&self) -> Vec<(FileStatus, usize)> {
        FileStatus::ALL
            .iter()
            .map(|&status| {
                let count = self
                    .history
                    .values()
                    .filter(|record| record.status == status)
                    .count();
                (status, count)
            })
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}

/// Scan `directory` against `prior`, reporting each record through
/// `observe` in traversal order as it is determined.
///
/// A [`ChecksumError`] on one file never aborts the scan: the file's prior
/// record, if any, is carried forward unchanged, the failure is collected in
/// the summary, and the walk continues. Unreadable directory entries are
/// skipped with a warning.
pub fn scan_directory<F>(
    directory: &Path,
    prior: &History,
    options: &ScanOptions,
    mut observe: F,
) -> Result<ScanSummary, ScanError>
where
    F: FnMut(&str, &FileRecord),
{
    let matcher = GlobBuilder::new(&options.pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ScanError::Pattern {
            pattern: options.pattern.clone(),
            source,
        })?
        .compile_matcher();

    let mut history = History::new();
    let mut failures = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(directory) else {
            continue;
        };
        if !matcher.is_match(relative) {
            continue;
        }

        let key = entry.path().display().to_string();
        match classify(entry.path(), options.ignore_mtime, prior) {
            Ok(record) => {
                observe(&key, &record);
                history.insert(key, record);
            }
            Err(error) => {
                warn!(path = %key, error = %error, "classification failed, continuing");
                if let Some(previous) = prior.get(&key) {
                    history.insert(key.clone(), previous.clone());
                }
                failures.push(FileFailure { path: key, error });
            }
        }
    }

    // Prior paths the walk did not touch have vanished. Entries already
    // marked removed stay out of the new history entirely, which is what
    // lets a reappearing file start over as `new`.
    for (path, record) in prior {
        if history.contains_key(path) || record.status == FileStatus::Removed {
            continue;
        }
        let removed = FileRecord::removed();
        observe(path, &removed);
        history.insert(path.clone(), removed);
    }

    debug!(
        entries = history.len(),
        failures = failures.len(),
        "scan complete"
    );
    Ok(ScanSummary { history, failures })
}
