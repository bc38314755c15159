//! SHA-256 hashing primitives for file content checksums

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Chunk size used when reading more than [`SMALL_READ_THRESHOLD`] bytes
pub const CHUNK_SIZE: usize = 4096;

/// At or below this total, reads degrade to 1-byte chunks
pub const SMALL_READ_THRESHOLD: u64 = 4096;

/// Errors from the checksum engine
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file ended before the requested number of bytes could be read.
    /// Surfaced as an error rather than a partial-content digest so a file
    /// that shrank mid-read is never mistaken for its former self.
    #[error("{path} ended after {actual} of {requested} requested bytes")]
    ShortRead {
        path: PathBuf,
        requested: u64,
        actual: u64,
    },
}

/// A SHA-256 digest (32 bytes)
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    /// Create a new Sha256Digest from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the digest as a byte slice
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        const HEX_CHARS: &[u8] = b"0123456789abcdef";
        let mut hex = String::with_capacity(64);
        for &byte in &self.0 {
            hex.push(HEX_CHARS[(byte >> 4) as usize] as char);
            hex.push(HEX_CHARS[(byte & 0xf) as usize] as char);
        }
        hex
    }

    /// Parse from hex string
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        if hex.len() != 64 {
            anyhow::bail!("Invalid hex length: expected 64 characters, got {}", hex.len());
        }

        let mut bytes = [0u8; 32];
        for i in 0..32 {
            let high = hex_char_to_nibble(hex.as_bytes()[i * 2])?;
            let low = hex_char_to_nibble(hex.as_bytes()[i * 2 + 1])?;
            bytes[i] = (high << 4) | low;
        }
        Ok(Self(bytes))
    }
}

/// Helper function to convert a hex character to a nibble
fn hex_char_to_nibble(c: u8) -> anyhow::Result<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => anyhow::bail!("Invalid hex character: {}", c as char),
    }
}

impl std::fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sha256Digest({})", self.to_hex())
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// On the wire a digest is its hex form, matching the persisted history format.
impl Serialize for Sha256Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(D::Error::custom)
    }
}

/// Hash bytes using SHA-256
pub fn checksum_bytes(data: &[u8]) -> Sha256Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Sha256Digest::from_bytes(hasher.finalize().into())
}

/// Checksum a file's content, or only its first `limit` bytes.
///
/// With no limit the file's current size decides how much is read. Reads go
/// through fixed-size chunks: [`CHUNK_SIZE`] bytes, except that totals at or
/// below [`SMALL_READ_THRESHOLD`] are read one byte at a time. Chunking only
/// shapes I/O granularity; the digest depends on the bytes alone.
///
/// Reaching EOF before the requested total is [`ChecksumError::ShortRead`],
/// never a digest over partial content.
pub fn checksum_file(path: &Path, limit: Option<u64>) -> Result<Sha256Digest, ChecksumError> {
    let total = match limit {
        Some(n) => n,
        None => file_size(path)?,
    };
    let chunk_size = if total > SMALL_READ_THRESHOLD { CHUNK_SIZE } else { 1 };
    checksum_file_chunked(path, total, chunk_size)
}

/// Checksum exactly `total` bytes of a file using a caller-chosen chunk size.
///
/// Exposed so tests can prove chunk size never changes the digest.
pub fn checksum_file_chunked(
    path: &Path,
    total: u64,
    chunk_size: usize,
) -> Result<Sha256Digest, ChecksumError> {
    debug_assert!(chunk_size > 0);

    let file = File::open(path).map_err(|source| ChecksumError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size];
    let mut remaining = total;

    while remaining > 0 {
        let want = (chunk_size as u64).min(remaining) as usize;
        let n = reader.read(&mut buf[..want]).map_err(|source| ChecksumError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            return Err(ChecksumError::ShortRead {
                path: path.to_path_buf(),
                requested: total,
                actual: total - remaining,
            });
        }
        hasher.update(&buf[..n]);
        remaining -= n as u64;
    }

    Ok(Sha256Digest::from_bytes(hasher.finalize().into()))
}

fn file_size(path: &Path) -> Result<u64, ChecksumError> {
    let meta = std::fs::metadata(path).map_err(|source| ChecksumError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(meta.len())
}
