//! Error types for rule checks, turn flow and persistence.
//!
//! Every `Display` string is short and meant to be shown to the player verbatim.

use crate::types::GameVariant;
use std::path::PathBuf;

/// Why a placement was rejected by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum IllegalReason {
    /// The active side already placed this turn.
    #[display("You have already moved this turn")]
    TurnAlreadyTaken,

    /// The coordinate is not on the board.
    #[display("({row}, {col}) is off the board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already holds a stone.
    #[display("That cell is already occupied")]
    Occupied,

    /// Go: the stone would have no liberty and captures nothing.
    #[display("Suicide is not allowed")]
    Suicide,

    /// Othello: the disc would not flip anything.
    #[display("That move flips no discs")]
    NoFlip,
}

impl std::error::Error for IllegalReason {}

/// Why the active side may not end its turn yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EndTurnRefusal {
    /// No stone placed and no pass made.
    #[display("You have not moved yet")]
    NoMoveYet,

    /// Go: an adjacent enemy group has no liberty and has not been captured.
    #[display("Capture the surrounded stones before ending your turn")]
    PendingCapture,
}

impl std::error::Error for EndTurnRefusal {}

/// Failures reading or writing stored games.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PersistenceError {
    /// A file already exists at the target path.
    #[display("{} already exists", _0.display())]
    CollisionOnSave(PathBuf),

    /// Nothing exists at the source path.
    #[display("{} does not exist", _0.display())]
    NotFound(PathBuf),

    /// The path was not produced by this table's own saves.
    #[display("{} is not a known state", _0.display())]
    UnknownState(PathBuf),

    /// The file could not be decoded into a valid record.
    #[display("Corrupt record: {_0}")]
    CorruptRecord(String),

    /// The stored position belongs to the other side's turn.
    #[display("Stored state is for {expected}'s turn, not {found}'s")]
    TurnMismatch {
        /// Side recorded as next to move.
        expected: crate::types::Side,
        /// Side currently to move.
        found: crate::types::Side,
    },

    /// The stored board has a different size than the live board.
    #[display("Stored board is {found}x{found}, expected {expected}x{expected}")]
    SizeMismatch {
        /// Live board size.
        expected: usize,
        /// Stored board size.
        found: usize,
    },

    /// Any other filesystem failure.
    #[display("I/O error: {_0}")]
    Io(String),
}

impl std::error::Error for PersistenceError {}

/// Top-level error for every recoverable failure in the engine.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// A coordinate outside `[0, size)`.
    #[display("({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Board size.
        size: usize,
    },

    /// Board sizes are limited to 8..=19.
    #[display("Board size {size} is not supported (8 to 19)")]
    InvalidBoardSize {
        /// Requested size.
        size: usize,
    },

    /// The rule engine rejected a placement.
    #[display("{_0}")]
    IllegalMove(IllegalReason),

    /// Not enough history to roll back a full turn.
    #[display("Undo not allowed.")]
    UndoUnavailable,

    /// The one undo of this turn was already spent.
    #[display("Only one undo per turn.")]
    UndoAlreadyUsed,

    /// The turn cannot end yet.
    #[display("{_0}")]
    EndTurnRefused(EndTurnRefusal),

    /// Passing is not part of this game, or not allowed right now.
    #[display("Passing is not allowed in {variant} now")]
    PassNotAllowed {
        /// The variant being played.
        variant: GameVariant,
    },

    /// Only Go has captures to resolve.
    #[display("There is nothing to capture in {variant}")]
    CaptureNotAllowed {
        /// The variant being played.
        variant: GameVariant,
    },

    /// The game has already been decided.
    #[display("Game is already over")]
    GameOver,

    /// Save/load failure.
    #[display("{_0}")]
    Persistence(PersistenceError),
}

impl std::error::Error for GameError {}

impl From<IllegalReason> for GameError {
    fn from(reason: IllegalReason) -> Self {
        GameError::IllegalMove(reason)
    }
}

impl From<EndTurnRefusal> for GameError {
    fn from(refusal: EndTurnRefusal) -> Self {
        GameError::EndTurnRefused(refusal)
    }
}

impl From<PersistenceError> for GameError {
    fn from(err: PersistenceError) -> Self {
        GameError::Persistence(err)
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

/// Result alias used across the crate.
pub type GameResult<T> = Result<T, GameError>;
