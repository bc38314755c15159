//! Common fixtures for integration tests

use std::path::{Path, PathBuf};

use drift_cli::RunConfig;
use tempfile::TempDir;

/// A scratch directory to scan plus a history file path beside it
pub struct TestWorkspace {
    _root: TempDir,
    pub scan_dir: PathBuf,
    pub history_file: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create tempdir");
        let scan_dir = root.path().join("data");
        std::fs::create_dir(&scan_dir).expect("create scan dir");
        let history_file = root.path().join("history.json");
        Self {
            _root: root,
            scan_dir,
            history_file,
        }
    }

    pub fn write_file(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.scan_dir.join(name);
        std::fs::write(&path, data).expect("write fixture file");
        path
    }

    pub fn config(&self) -> RunConfig {
        RunConfig {
            directory: self.scan_dir.clone(),
            history_file: self.history_file.clone(),
            pattern: "*".to_string(),
            ignore_mtime: false,
            verbose: false,
        }
    }

    /// The history key for a fixture file, as the scanner derives it
    pub fn key(&self, name: &str) -> String {
        self.scan_dir.join(name).display().to_string()
    }

    /// Parse the persisted history file as raw JSON
    pub fn raw_history(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(&self.history_file).expect("read history file");
        serde_json::from_str(&text).expect("parse history JSON")
    }

    /// Backup files created by rotation, sorted by name
    pub fn backups(&self) -> Vec<PathBuf> {
        let dir = self.history_file.parent().unwrap();
        let mut backups: Vec<PathBuf> = std::fs::read_dir(dir)
            .expect("read history dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_backup(path))
            .collect();
        backups.sort();
        backups
    }
}

fn is_backup(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("history.bak-"))
}
