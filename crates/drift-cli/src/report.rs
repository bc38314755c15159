//! Per-file status table output

use drift_core::record::{FileRecord, FileStatus};
use owo_colors::OwoColorize;

/// Print the table header: STATUS / SIZE / CHECKSUM / PATH
pub fn print_header() {
    println!("{:<26}{:<10}{:<65}PATH", "STATUS", "SIZE", "CHECKSUM");
}

/// Print one table row, status cell colored by kind.
///
/// Padding is applied before coloring so the ANSI escapes never skew the
/// column alignment.
pub fn print_row(path: &str, record: &FileRecord) {
    let status = format!("{:<26}", record.status);
    let status = match record.status {
        FileStatus::New => status.green().to_string(),
        FileStatus::Unchanged => status.to_string(),
        FileStatus::Appended => status.yellow().to_string(),
        FileStatus::Modified => status.yellow().to_string(),
        FileStatus::Removed => status.red().to_string(),
        FileStatus::NotAFile | FileStatus::MtimeUnchanged => status.dimmed().to_string(),
    };
    println!("{}{:<10}{:<65}{}", status, size_cell(record), checksum_cell(record), path);
}

/// The SIZE cell: byte count or the `-` sentinel
pub fn size_cell(record: &FileRecord) -> String {
    match record.size {
        Some(size) => size.to_string(),
        None => "-".to_string(),
    }
}

/// The CHECKSUM cell: lowercase hex digest or the `-` sentinel
pub fn checksum_cell(record: &FileRecord) -> String {
    match record.checksum {
        Some(checksum) => checksum.to_hex(),
        None => "-".to_string(),
    }
}
