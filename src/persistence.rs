//! Saving, loading and discarding the match snapshot.
//!
//! A snapshot is the magic bytes `NVBT`, one format version byte and the
//! bincode encoding of [`MatchState`]. Stores always hold at most one
//! snapshot; saving replaces it whole.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bincode::Options;

use crate::common::BoardError;
use crate::config::SNAPSHOT_VERSION;
use crate::game::MatchState;

const MAGIC: &[u8; 4] = b"NVBT";
const HEADER_LEN: usize = MAGIC.len() + 1;

/// Upper bound on a decoded snapshot, guarding against corrupt lengths.
const MAX_SNAPSHOT_BYTES: u64 = 1 << 20;

/// Why a snapshot could not be written or read back.
#[derive(Debug)]
pub enum PersistenceError {
    /// No snapshot has been saved.
    NotFound,
    /// The storage medium failed.
    Io(io::Error),
    /// The payload could not be encoded or decoded.
    Codec(bincode::Error),
    /// The data does not start with a snapshot header.
    BadHeader,
    /// The snapshot was written by an incompatible format version.
    UnsupportedVersion(u8),
    /// The snapshot decoded but describes an impossible match.
    Invalid(BoardError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::NotFound => write!(f, "no saved match"),
            PersistenceError::Io(e) => write!(f, "snapshot I/O failed: {}", e),
            PersistenceError::Codec(e) => write!(f, "snapshot encoding failed: {}", e),
            PersistenceError::BadHeader => write!(f, "not a match snapshot"),
            PersistenceError::UnsupportedVersion(v) => {
                write!(f, "snapshot format version {} is not supported", v)
            }
            PersistenceError::Invalid(e) => write!(f, "snapshot rejected: {}", e),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Codec(e) => Some(e),
            PersistenceError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            PersistenceError::NotFound
        } else {
            PersistenceError::Io(err)
        }
    }
}

impl From<bincode::Error> for PersistenceError {
    fn from(err: bincode::Error) -> Self {
        PersistenceError::Codec(err)
    }
}

impl From<BoardError> for PersistenceError {
    fn from(err: BoardError) -> Self {
        PersistenceError::Invalid(err)
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_SNAPSHOT_BYTES)
}

/// Encode `state` with the snapshot header.
pub fn encode_snapshot(state: &MatchState) -> Result<Vec<u8>, PersistenceError> {
    let mut bytes = Vec::with_capacity(512);
    bytes.extend_from_slice(MAGIC);
    bytes.push(SNAPSHOT_VERSION);
    codec().serialize_into(&mut bytes, state)?;
    Ok(bytes)
}

/// Decode bytes produced by [`encode_snapshot`].
pub fn decode_snapshot(bytes: &[u8]) -> Result<MatchState, PersistenceError> {
    if bytes.len() < HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
        return Err(PersistenceError::BadHeader);
    }
    let version = bytes[MAGIC.len()];
    if version != SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(version));
    }
    Ok(codec().deserialize(&bytes[HEADER_LEN..])?)
}

/// Durable home of the single match snapshot.
pub trait MatchStore {
    /// Replace the stored snapshot with `state`.
    fn save(&mut self, state: &MatchState) -> Result<(), PersistenceError>;

    /// Read the stored snapshot. `NotFound` when there is none.
    fn load(&self) -> Result<MatchState, PersistenceError>;

    /// Remove the stored snapshot. Removing nothing is not an error.
    fn delete(&mut self) -> Result<(), PersistenceError>;

    /// Whether a snapshot is stored, i.e. a match can be resumed.
    fn exists(&self) -> bool;
}

/// Snapshot kept in a single file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl MatchStore for FileStore {
    fn save(&mut self, state: &MatchState) -> Result<(), PersistenceError> {
        let bytes = encode_snapshot(state)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(PersistenceError::Io)?;
        }
        // Write aside and rename so a crash never leaves a torn snapshot.
        let tmp = self.temp_path();
        let mut file = File::create(&tmp).map_err(PersistenceError::Io)?;
        file.write_all(&bytes).map_err(PersistenceError::Io)?;
        file.sync_all().map_err(PersistenceError::Io)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(PersistenceError::Io)?;
        Ok(())
    }

    fn load(&self) -> Result<MatchState, PersistenceError> {
        let bytes = fs::read(&self.path)?;
        decode_snapshot(&bytes)
    }

    fn delete(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::Io(e)),
        }
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Snapshot kept in memory, encoded exactly as a [`FileStore`] would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bytes: Option<Vec<u8>>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with raw snapshot bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Some(bytes),
            saves: 0,
        }
    }

    /// Raw bytes of the stored snapshot.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl MatchStore for MemoryStore {
    fn save(&mut self, state: &MatchState) -> Result<(), PersistenceError> {
        self.bytes = Some(encode_snapshot(state)?);
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<MatchState, PersistenceError> {
        let bytes = self.bytes.as_deref().ok_or(PersistenceError::NotFound)?;
        decode_snapshot(bytes)
    }

    fn delete(&mut self) -> Result<(), PersistenceError> {
        self.bytes = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.bytes.is_some()
    }
}
