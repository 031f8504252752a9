//! Save-file records and the store that writes and reads them.
//!
//! Two JSON shapes are supported:
//!
//! ```json
//! { "turn_owner_or_curr_turn": "BLACK", "chessboards": [ [[null, "WHITE", ...], ...], ... ] }
//! { "next_player_for_curr_state": "WHITE", "chessboard": [[null, ...], ...] }
//! ```
//!
//! The first holds a whole game history, the second a single position.

use crate::board::Board;
use crate::error::PersistenceError;
use crate::types::Side;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Every snapshot of a game, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct HistoryRecord {
    /// Side to move from the last snapshot.
    #[serde(rename = "turn_owner_or_curr_turn")]
    pub turn_owner: Side,
    /// Snapshots, oldest first.
    #[serde(rename = "chessboards")]
    pub boards: Vec<Board>,
}

/// One position and who moves next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct SnapshotRecord {
    /// Side to move from this position.
    #[serde(rename = "next_player_for_curr_state")]
    pub next_player: Side,
    /// The position.
    #[serde(rename = "chessboard")]
    pub board: Board,
}

/// Any stored game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredGameRecord {
    /// A full history save.
    History(HistoryRecord),
    /// A single-position save.
    Snapshot(SnapshotRecord),
}

impl StoredGameRecord {
    /// Side to move from the stored position.
    pub fn turn_owner(&self) -> Side {
        match self {
            StoredGameRecord::History(record) => record.turn_owner,
            StoredGameRecord::Snapshot(record) => record.next_player,
        }
    }

    /// Stored boards, oldest first.
    pub fn boards(&self) -> &[Board] {
        match self {
            StoredGameRecord::History(record) => &record.boards,
            StoredGameRecord::Snapshot(record) => std::slice::from_ref(&record.board),
        }
    }

    /// The position play would resume from.
    pub fn latest(&self) -> Option<&Board> {
        self.boards().last()
    }

    /// Checks that the record can resume play for `active` on a `size` board.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::TurnMismatch`] when the stored side to move is not
    /// `active`; [`PersistenceError::SizeMismatch`] when the board size differs.
    pub fn check_resumable(&self, active: Side, size: usize) -> Result<(), PersistenceError> {
        if self.turn_owner() != active {
            return Err(PersistenceError::TurnMismatch {
                expected: self.turn_owner(),
                found: active,
            });
        }
        if let Some(board) = self.latest()
            && board.size() != size
        {
            return Err(PersistenceError::SizeMismatch {
                expected: size,
                found: board.size(),
            });
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), PersistenceError> {
        let boards = self.boards();
        let Some(first) = boards.first() else {
            return Err(PersistenceError::CorruptRecord(
                "record holds no boards".to_string(),
            ));
        };
        if boards.iter().any(|board| board.size() != first.size()) {
            return Err(PersistenceError::CorruptRecord(
                "boards differ in size".to_string(),
            ));
        }
        Ok(())
    }
}

/// Encodes a record as pretty JSON.
///
/// # Errors
///
/// Returns [`PersistenceError::CorruptRecord`] if encoding fails.
#[instrument(skip(record))]
pub fn serialize(record: &StoredGameRecord) -> Result<Vec<u8>, PersistenceError> {
    serde_json::to_vec_pretty(record).map_err(|e| PersistenceError::CorruptRecord(e.to_string()))
}

/// Decodes and validates a record.
///
/// # Errors
///
/// Returns [`PersistenceError::CorruptRecord`] for malformed JSON, bad grids,
/// empty histories, or mixed board sizes.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn deserialize(bytes: &[u8]) -> Result<StoredGameRecord, PersistenceError> {
    let record: StoredGameRecord = serde_json::from_slice(bytes).map_err(|e| {
        warn!(error = %e, "Failed to decode record");
        PersistenceError::CorruptRecord(e.to_string())
    })?;
    record.validate()?;
    Ok(record)
}

/// Writes a record, refusing to replace an existing file.
///
/// # Errors
///
/// [`PersistenceError::CollisionOnSave`] if `path` exists, otherwise
/// [`PersistenceError::Io`].
#[instrument(skip(record), fields(path = %path.display()))]
pub fn write_record(path: &Path, record: &StoredGameRecord) -> Result<(), PersistenceError> {
    let bytes = serialize(record)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => PersistenceError::CollisionOnSave(path.to_path_buf()),
            _ => PersistenceError::from(e),
        })?;
    file.write_all(&bytes)?;
    debug!(bytes = bytes.len(), "Record written");
    Ok(())
}

/// Reads and decodes a record.
///
/// # Errors
///
/// [`PersistenceError::NotFound`] if nothing is at `path`, plus any
/// [`deserialize`] error.
#[instrument(fields(path = %path.display()))]
pub fn read_record(path: &Path) -> Result<StoredGameRecord, PersistenceError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PersistenceError::NotFound(path.to_path_buf()),
        _ => PersistenceError::from(e),
    })?;
    deserialize(&bytes)
}

/// Saves records under a root directory and remembers what it saved.
///
/// Only paths this store has written can be loaded back.
#[derive(Debug, Clone)]
pub struct GameStore {
    root: PathBuf,
    known: HashSet<PathBuf>,
}

impl GameStore {
    /// Creates a store rooted at `root`.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            known: HashSet::new(),
        }
    }

    /// Resolves a save name against the root; absolute paths are kept.
    pub fn resolve(&self, name: impl AsRef<Path>) -> PathBuf {
        let name = name.as_ref();
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.root.join(name)
        }
    }

    /// True if this store wrote `name`.
    pub fn is_known(&self, name: impl AsRef<Path>) -> bool {
        self.known.contains(&self.resolve(name))
    }

    /// Writes `record` to `name` and registers it as a known state.
    ///
    /// # Errors
    ///
    /// See [`write_record`].
    #[instrument(skip(self, record), fields(name = %name.as_ref().display()))]
    pub fn save(
        &mut self,
        name: impl AsRef<Path>,
        record: &StoredGameRecord,
    ) -> Result<PathBuf, PersistenceError> {
        let path = self.resolve(name);
        write_record(&path, record)?;
        self.known.insert(path.clone());
        info!(path = %path.display(), "Game state stored");
        Ok(path)
    }

    /// Reads a record previously written by [`GameStore::save`].
    ///
    /// # Errors
    ///
    /// [`PersistenceError::UnknownState`] for paths this store never wrote,
    /// regardless of what the file holds; otherwise see [`read_record`].
    #[instrument(skip(self), fields(name = %name.as_ref().display()))]
    pub fn load(&self, name: impl AsRef<Path>) -> Result<StoredGameRecord, PersistenceError> {
        let path = self.resolve(name);
        if !self.known.contains(&path) {
            warn!(path = %path.display(), "Refusing to load unknown state");
            return Err(PersistenceError::UnknownState(path));
        }
        read_record(&path)
    }

    /// Every stored board of a known record, in order, for playback.
    ///
    /// # Errors
    ///
    /// Same as [`GameStore::load`].
    pub fn replay(&self, name: impl AsRef<Path>) -> Result<Vec<Board>, PersistenceError> {
        Ok(self.load(name)?.boards().to_vec())
    }
}
