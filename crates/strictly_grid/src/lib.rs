//! Strictly Grid - rule engine for two-player grid board games
//!
//! Gomoku, Go and Othello share one square board, one turn state machine
//! and one save format.
//!
//! # Architecture
//!
//! - **Board**: bounds-checked grid of cells, no rule knowledge
//! - **Rules**: per-variant legality, placement, win and draw checks
//! - **Session**: turn bookkeeping over a board and its rules
//! - **History**: board snapshots with full-turn undo
//! - **Codec**: JSON save records and a store that only reloads its own saves
//! - **Table**: action-driven orchestration for front ends
//! - **AI**: legal-move listing and seeded bots
//!
//! # Example
//!
//! ```
//! use strictly_grid::{Action, GameVariant, Pos, SessionOptions, Table};
//!
//! # fn example() -> Result<(), strictly_grid::GameError> {
//! let mut table = Table::new(GameVariant::Gomoku, 15, SessionOptions::default(), "saves")?;
//! table.handle(Action::Place(Pos::new(7, 7)))?;
//! table.handle(Action::EndTurn)?;
//! println!("{}", table.session().board().display());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod ai;
mod board;
mod codec;
mod error;
mod history;
mod session;
mod table;
mod types;

/// Per-variant rule functions.
pub mod rules;

// Crate-level exports - Core types
pub use types::{Cell, GameVariant, Outcome, Pos, Side};

// Crate-level exports - Board
pub use board::{Board, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

// Crate-level exports - Errors
pub use error::{EndTurnRefusal, GameError, GameResult, IllegalReason, PersistenceError};

// Crate-level exports - Rules
pub use rules::{PassState, RuleSet};

// Crate-level exports - Turn flow
pub use history::HistoryManager;
pub use session::{GameSession, MoveReport, SessionOptions, TurnPhase, TurnState};
pub use table::{Action, Hint, Table};

// Crate-level exports - Persistence
pub use codec::{
    GameStore, HistoryRecord, SnapshotRecord, StoredGameRecord, deserialize, read_record,
    serialize, write_record,
};

// Crate-level exports - AI
pub use ai::{Bot, BotDecision, BotLevel, apply_move, gomoku_score, list_legal_moves, othello_score};
