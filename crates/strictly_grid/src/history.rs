//! Snapshot history for single-turn undo.
//!
//! One snapshot is appended after every committed move, starting with the
//! opening position. Undo drops the two most recent snapshots (the
//! opponent's reply and the side's own move) and hands back the new top.

use crate::board::Board;
use tracing::{debug, instrument};

/// Append-only log of board snapshots.
///
/// Snapshots are independent values: mutating the live board never changes
/// a stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryManager {
    snapshots: Vec<Board>,
}

impl HistoryManager {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history from previously stored snapshots, oldest first.
    pub fn from_snapshots(snapshots: Vec<Board>) -> Self {
        Self { snapshots }
    }

    /// Appends a copy of `board`.
    #[instrument(skip_all, fields(len = self.snapshots.len() + 1))]
    pub fn snapshot(&mut self, board: &Board) {
        self.snapshots.push(board.clone());
    }

    /// Replaces the most recent snapshot, e.g. after a capture finished the move.
    ///
    /// Appends instead when the history is empty.
    pub fn amend(&mut self, board: &Board) {
        match self.snapshots.last_mut() {
            Some(top) => *top = board.clone(),
            None => self.snapshots.push(board.clone()),
        }
    }

    /// Pops the two latest snapshots and returns the one now on top.
    ///
    /// Returns `None`, leaving the history untouched, when fewer than three
    /// snapshots exist.
    #[instrument(skip(self), fields(len = self.snapshots.len()))]
    pub fn undo(&mut self) -> Option<Board> {
        if self.snapshots.len() < 3 {
            debug!("Not enough history to undo");
            return None;
        }
        self.snapshots.truncate(self.snapshots.len() - 2);
        self.snapshots.last().cloned()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The most recent snapshot.
    pub fn latest(&self) -> Option<&Board> {
        self.snapshots.last()
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[Board] {
        &self.snapshots
    }
}
