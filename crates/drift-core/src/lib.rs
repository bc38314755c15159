//! Drift core - change detection for files across repeated runs
//!
//! This crate provides the decision logic and state layer:
//! - SHA-256 content checksums with optional prefix limits
//! - Five-way change classification (new / unchanged / appended-to /
//!   modified / removed) against a persisted history
//! - History load, timestamped backup rotation, and atomic save
//! - Single-pass directory scan orchestration

pub mod classify;
pub mod hash;
pub mod history;
pub mod record;
pub mod scan;

// Re-export main types for convenience
pub use classify::classify;
pub use hash::{checksum_bytes, checksum_file, ChecksumError, Sha256Digest};
pub use history::HistoryError;
pub use record::{FileRecord, FileStatus, History};
pub use scan::{scan_directory, FileFailure, ScanError, ScanOptions, ScanSummary};
