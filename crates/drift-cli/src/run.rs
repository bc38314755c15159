//! Full-run orchestration: load, scan, rotate, save

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use drift_core::scan::{scan_directory, ScanOptions, ScanSummary};
use drift_core::history;

use crate::report;

/// Everything one run needs to know
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory to scan
    pub directory: PathBuf,
    /// Path of the persisted history file
    pub history_file: PathBuf,
    /// Glob selecting entries within the directory
    pub pattern: String,
    /// Skip rehashing files whose mtime is unchanged
    pub ignore_mtime: bool,
    /// Stream a per-file status table to stdout
    pub verbose: bool,
}

/// Execute one complete run.
///
/// Loads the prior history, scans the directory (streaming the status table
/// when verbose), rotates any existing history file aside to a timestamped
/// backup, and persists the merged result. Per-file checksum failures do not
/// abort the run; they come back in the summary so the caller can decide the
/// exit code after the new history is safely on disk.
pub fn run(config: &RunConfig) -> Result<ScanSummary> {
    // 1. Load prior history (missing or unparseable means first run)
    let prior = history::load(&config.history_file)
        .context("Failed to load history file")?;

    // 2. Scan and classify in traversal order
    let options = ScanOptions {
        pattern: config.pattern.clone(),
        ignore_mtime: config.ignore_mtime,
    };
    if config.verbose {
        report::print_header();
    }
    let summary = scan_directory(&config.directory, &prior, &options, |path, record| {
        if config.verbose {
            report::print_row(path, record);
        }
    })
    .context("Scan failed")?;

    // 3. Rotate the previous history aside, then persist the new one
    history::rotate_backup(&config.history_file)
        .context("Failed to rotate previous history aside")?;
    history::save(&summary.history, &config.history_file)
        .context("Failed to persist history file")?;

    for (status, count) in summary.status_counts() {
        info!(status = %status, count, "run summary");
    }

    Ok(summary)
}
