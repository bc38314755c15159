//! File status and history record data structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hash::Sha256Digest;

/// Classification of a scanned path relative to its recorded history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    /// No usable prior record existed
    #[serde(rename = "new")]
    New,
    /// Full-content checksum equals the prior checksum
    #[serde(rename = "unchanged")]
    Unchanged,
    /// Checksum differs, but the first `prior.size` bytes still hash to the
    /// prior checksum: the file grew and its original bytes are untouched
    #[serde(rename = "changed (appended to)")]
    Appended,
    /// Checksum differs and the append hypothesis failed (shrank, altered,
    /// or both)
    #[serde(rename = "changed (modified)")]
    Modified,
    /// Present in prior history, absent from the current scan
    #[serde(rename = "removed")]
    Removed,
    /// The path does not resolve to a regular file
    #[serde(rename = "ignored (not a file)")]
    NotAFile,
    /// Skipped under the mtime policy; prior fields carried forward
    #[serde(rename = "ignored (mtime unchanged)")]
    MtimeUnchanged,
}

impl FileStatus {
    /// Every status, in the order summaries report them
    pub const ALL: [FileStatus; 7] = [
        FileStatus::New,
        FileStatus::Unchanged,
        FileStatus::Appended,
        FileStatus::Modified,
        FileStatus::Removed,
        FileStatus::NotAFile,
        FileStatus::MtimeUnchanged,
    ];

    /// The label used in the persisted history and in table output
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::New => "new",
            FileStatus::Unchanged => "unchanged",
            FileStatus::Appended => "changed (appended to)",
            FileStatus::Modified => "changed (modified)",
            FileStatus::Removed => "removed",
            FileStatus::NotAFile => "ignored (not a file)",
            FileStatus::MtimeUnchanged => "ignored (mtime unchanged)",
        }
    }

    /// True for the two `changed (...)` variants
    pub fn is_changed(&self) -> bool {
        matches!(self, FileStatus::Appended | FileStatus::Modified)
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recorded state of one path at the time of a run.
///
/// Built whole each run, never field-patched. `size`, `checksum` and `mtime`
/// are absent for `removed` and `ignored (not a file)` records; on the wire
/// absence is the `"-"` sentinel, and entirely missing keys are tolerated on
/// load (older histories write `removed` rows with only a status).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub status: FileStatus,
    #[serde(default, with = "dash_sentinel")]
    pub size: Option<u64>,
    #[serde(default, with = "dash_sentinel")]
    pub checksum: Option<Sha256Digest>,
    #[serde(default, with = "dash_sentinel")]
    pub mtime: Option<f64>,
}

impl FileRecord {
    /// Record for a path that does not resolve to a regular file
    pub fn not_a_file() -> Self {
        Self {
            status: FileStatus::NotAFile,
            size: None,
            checksum: None,
            mtime: None,
        }
    }

    /// Record synthesized for a path that vanished since the prior run
    pub fn removed() -> Self {
        Self {
            status: FileStatus::Removed,
            size: None,
            checksum: None,
            mtime: None,
        }
    }

    /// Record freshly measured from a live file
    pub fn measured(status: FileStatus, size: u64, checksum: Sha256Digest, mtime: f64) -> Self {
        Self {
            status,
            size: Some(size),
            checksum: Some(checksum),
            mtime: Some(mtime),
        }
    }

    /// Whether this record can serve as a comparison baseline: a `removed`
    /// record, or one without a checksum, never gates classification
    pub fn is_usable_prior(&self) -> bool {
        self.status != FileStatus::Removed && self.checksum.is_some()
    }
}

/// Persisted state between runs: path string -> record.
///
/// A BTreeMap keeps the serialized JSON in stable key order, which makes
/// consecutive history files diffable.
pub type History = BTreeMap<String, FileRecord>;

/// Serde adapter mapping `None` to the `"-"` sentinel used by the history
/// file format.
mod dash_sentinel {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_str("-"),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Value(T),
            Sentinel(String),
        }

        match Raw::<T>::deserialize(deserializer)? {
            Raw::Value(value) => Ok(Some(value)),
            Raw::Sentinel(s) if s == "-" => Ok(None),
            Raw::Sentinel(s) => Err(D::Error::custom(format!(
                "expected value or \"-\" sentinel, got {:?}",
                s
            ))),
        }
    }
}
