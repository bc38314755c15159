//! History file persistence: load, backup rotation, atomic save

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::record::History;

/// Errors around the persisted history file
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to read history file {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renaming the previous history aside failed for a reason other than
    /// the file not existing. Surfaced rather than swallowed so permission
    /// problems never masquerade as "no backup needed".
    #[error("failed to rename {path} aside to {backup}")]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to persist history file {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load the history at `path`.
///
/// A missing file or unparseable contents is first-run semantics: an empty
/// history, with a warning for the unparseable case. Other read failures
/// are real errors.
pub fn load(path: &Path) -> Result<History, HistoryError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no history file, starting empty");
            return Ok(History::new());
        }
        Err(source) => {
            return Err(HistoryError::Load {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match serde_json::from_str(&raw) {
        Ok(history) => Ok(history),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unparseable history, starting empty");
            Ok(History::new())
        }
    }
}

/// Rename an existing history file aside to a timestamped backup.
///
/// The backup name replaces the final extension with `bak-<timestamp>`,
/// e.g. `history.json` becomes `history.bak-2026-08-27-14:03:59.812331`.
/// Returns the backup path, or `None` when there was nothing to rotate.
pub fn rotate_backup(path: &Path) -> Result<Option<PathBuf>, HistoryError> {
    if !path.exists() {
        return Ok(None);
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H:%M:%S%.6f");
    let backup = path.with_extension(format!("bak-{}", timestamp));
    std::fs::rename(path, &backup).map_err(|source| HistoryError::Backup {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;
    debug!(backup = %backup.display(), "rotated previous history aside");
    Ok(Some(backup))
}

/// Write the history to `path` atomically.
///
/// Serializes into a temporary file next to the destination and renames it
/// into place, so a crash mid-write can never leave a truncated history.
pub fn save(history: &History, path: &Path) -> Result<(), HistoryError> {
    let persist_err = |source: std::io::Error| HistoryError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match parent {
        Some(dir) => tempfile::NamedTempFile::new_in(dir),
        None => tempfile::NamedTempFile::new_in("."),
    }
    .map_err(persist_err)?;

    let json = serde_json::to_string_pretty(history).map_err(|err| persist_err(err.into()))?;
    tmp.write_all(json.as_bytes()).map_err(persist_err)?;
    tmp.write_all(b"\n").map_err(persist_err)?;
    tmp.persist(path).map_err(|err| persist_err(err.error))?;

    debug!(path = %path.display(), entries = history.len(), "history saved");
    Ok(())
}
