//! Drift CLI - drift command

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use drift_cli::{run, RunConfig};

/// Drift - checks files for changes since the last run
#[derive(Parser)]
#[command(name = "drift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to scan
    directory: PathBuf,

    /// History file path
    history_file: PathBuf,

    /// Glob pattern selecting files within the directory
    #[arg(short, long, default_value = "*")]
    glob: String,

    /// Skip rehashing files whose mtime hasn't changed since the last run.
    /// Faster, but a file rewritten with its mtime preserved goes undetected.
    #[arg(short = 'm', long)]
    mtime: bool,

    /// Print a per-file status table while scanning
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let summary = run(&RunConfig {
        directory: cli.directory,
        history_file: cli.history_file,
        pattern: cli.glob,
        ignore_mtime: cli.mtime,
        verbose: cli.verbose,
    })?;

    // History is already persisted at this point; failed files only decide
    // the exit code.
    if !summary.failures.is_empty() {
        for failure in &summary.failures {
            eprintln!("error: {}: {}", failure.path, failure.error);
        }
        anyhow::bail!("{} file(s) could not be checksummed", summary.failures.len());
    }

    Ok(())
}
