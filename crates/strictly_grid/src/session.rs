//! Turn-level state machine over one board.

use crate::board::Board;
use crate::codec::{HistoryRecord, SnapshotRecord, StoredGameRecord};
use crate::error::{EndTurnRefusal, GameError, GameResult, IllegalReason};
use crate::history::HistoryManager;
use crate::rules::{RuleSet, go};
use crate::types::{Cell, GameVariant, Outcome, Pos, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Per-turn bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Side whose turn it is.
    pub active_side: Side,
    /// Whether the active side already placed (or passed) this turn.
    pub turn_taken: bool,
    /// Where the active side placed this turn.
    pub last_move: Option<Pos>,
}

impl TurnState {
    fn opening() -> Self {
        Self {
            active_side: Side::Black,
            turn_taken: false,
            last_move: None,
        }
    }
}

/// Where the active side is within its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum TurnPhase {
    /// Nothing placed yet.
    AwaitingMove,
    /// Placed or passed; the turn may be ended.
    TurnComplete,
}

/// Tunables that change how a session plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Go: capture surrounded enemy groups as part of every move.
    pub auto_capture: bool,
}

/// What a committed move did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Where the stone went.
    pub pos: Pos,
    /// Who placed it.
    pub side: Side,
    /// Othello discs flipped.
    pub flipped: Vec<Pos>,
    /// Go stones captured as part of the move.
    pub captured: usize,
}

/// A board, its rules, and the turn bookkeeping around them.
#[derive(Debug, Clone)]
pub struct GameSession {
    rules: RuleSet,
    board: Board,
    turn: TurnState,
    history: HistoryManager,
    options: SessionOptions,
}

impl GameSession {
    /// Starts a game: opening layout on a fresh board, Black to move, and
    /// the opening position as the first history entry.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidBoardSize`] outside 8..=19.
    #[instrument]
    pub fn new(variant: GameVariant, size: usize, options: SessionOptions) -> GameResult<Self> {
        let rules = RuleSet::for_variant(variant);
        let mut board = Board::new(size)?;
        rules.setup(&mut board);

        let mut history = HistoryManager::new();
        history.snapshot(&board);

        info!(%variant, size, "Session started");
        Ok(Self {
            rules,
            board,
            turn: TurnState::opening(),
            history,
            options,
        })
    }

    /// The variant being played.
    pub fn variant(&self) -> GameVariant {
        self.rules.variant()
    }

    /// Rules with their current auxiliary state.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The live board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side length of the board.
    pub fn board_size(&self) -> usize {
        self.board.size()
    }

    /// Reads one cell of the live board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] off the board.
    pub fn get_cell(&self, row: usize, col: usize) -> GameResult<Cell> {
        self.board.get(row, col)
    }

    /// Current turn bookkeeping.
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// Side whose turn it is.
    pub fn active_side(&self) -> Side {
        self.turn.active_side
    }

    /// Where the active side is within its turn.
    pub fn phase(&self) -> TurnPhase {
        if self.turn.turn_taken {
            TurnPhase::TurnComplete
        } else {
            TurnPhase::AwaitingMove
        }
    }

    /// Snapshot history.
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Side that moves next from the current position.
    pub fn next_to_move(&self) -> Side {
        if self.turn.turn_taken {
            self.turn.active_side.opponent()
        } else {
            self.turn.active_side
        }
    }

    /// Places a stone for the active side.
    ///
    /// On success the board is updated, the turn is marked as taken, and a
    /// snapshot is appended to the history.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalMove`] with the rule engine's reason.
    #[instrument(skip(self), fields(side = ?self.turn.active_side))]
    pub fn attempt_move(&mut self, pos: Pos) -> GameResult<MoveReport> {
        let side = self.turn.active_side;
        self.rules
            .is_legal(pos, &self.board, side, self.turn.turn_taken)
            .inspect_err(|reason| warn!(%pos, %reason, "Move rejected"))?;

        let flipped = self.rules.apply(pos, &mut self.board, side);
        let captured = match self.rules {
            RuleSet::Go(_) if self.options.auto_capture => go::capture(&mut self.board, pos, side),
            _ => 0,
        };
        self.rules.record_pass(side, false);
        self.turn.turn_taken = true;
        self.turn.last_move = Some(pos);
        self.history.snapshot(&self.board);

        info!(%pos, ?side, flipped = flipped.len(), captured, "Move committed");
        Ok(MoveReport {
            pos,
            side,
            flipped,
            captured,
        })
    }

    /// Passes the active side's turn.
    ///
    /// Always allowed in Go; in Othello only when no placement exists.
    ///
    /// # Errors
    ///
    /// [`IllegalReason::TurnAlreadyTaken`] after a placement, or
    /// [`GameError::PassNotAllowed`] when the variant forbids it.
    #[instrument(skip(self), fields(side = ?self.turn.active_side))]
    pub fn pass(&mut self) -> GameResult<()> {
        let side = self.turn.active_side;
        if self.turn.turn_taken {
            return Err(IllegalReason::TurnAlreadyTaken.into());
        }
        if !self.rules.may_pass(&self.board, side) {
            warn!(variant = %self.variant(), "Pass refused");
            return Err(GameError::PassNotAllowed {
                variant: self.variant(),
            });
        }
        self.rules.record_pass(side, true);
        self.turn.turn_taken = true;
        self.history.snapshot(&self.board);
        info!(?side, "Passed");
        Ok(())
    }

    /// Go: removes enemy groups left without liberty next to this turn's stone.
    ///
    /// Returns the number of stones removed; the latest history snapshot is
    /// amended so undo keeps the captured position.
    ///
    /// # Errors
    ///
    /// [`GameError::CaptureNotAllowed`] outside Go.
    #[instrument(skip(self))]
    pub fn capture(&mut self) -> GameResult<usize> {
        let RuleSet::Go(_) = self.rules else {
            return Err(GameError::CaptureNotAllowed {
                variant: self.variant(),
            });
        };
        let Some(pos) = self.turn.last_move else {
            debug!("No stone placed this turn");
            return Ok(0);
        };
        let removed = go::capture(&mut self.board, pos, self.turn.active_side);
        if removed > 0 {
            self.history.amend(&self.board);
        }
        Ok(removed)
    }

    /// Go: whether an adjacent enemy group still waits to be captured.
    pub fn has_pending_capture(&self) -> bool {
        match (self.rules, self.turn.last_move) {
            (RuleSet::Go(_), Some(pos)) => {
                go::has_pending_capture(&self.board, pos, self.turn.active_side)
            }
            _ => false,
        }
    }

    /// Whether the active side may end its turn.
    ///
    /// Every variant needs the turn taken. In Go, ending by explicit request
    /// also needs every surrounded enemy group next to the last stone
    /// captured; a pass ends the turn without that check.
    ///
    /// # Errors
    ///
    /// The [`EndTurnRefusal`] explaining what is missing.
    pub fn next_turn_allowed(&self, by_request: bool) -> Result<(), EndTurnRefusal> {
        if !self.turn.turn_taken {
            return Err(EndTurnRefusal::NoMoveYet);
        }
        if by_request && self.has_pending_capture() {
            return Err(EndTurnRefusal::PendingCapture);
        }
        Ok(())
    }

    /// Hands the turn to the other side.
    #[instrument(skip(self))]
    pub fn begin_next_turn(&mut self) {
        self.turn = TurnState {
            active_side: self.turn.active_side.opponent(),
            turn_taken: false,
            last_move: None,
        };
        debug!(side = ?self.turn.active_side, "Turn begins");
    }

    /// Whether a winner check is meaningful now.
    pub fn allow_winner_check(&self) -> bool {
        self.rules.allow_winner_check(&self.board)
    }

    /// Winner of the current position, per the variant's rules.
    pub fn check_win(&self) -> Option<Side> {
        self.rules.check_win(&self.board)
    }

    /// Whether the current position is a draw.
    pub fn check_draw(&self) -> bool {
        self.rules.check_draw(&self.board)
    }

    /// The decided result, if the game can be judged now.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.allow_winner_check() {
            return None;
        }
        if let Some(side) = self.check_win() {
            Some(Outcome::Winner(side))
        } else if self.check_draw() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// Rolls back one full turn: the opponent's last reply and the active
    /// side's previous move or pass.
    ///
    /// # Errors
    ///
    /// [`GameError::UndoUnavailable`] when the history is too short or the
    /// active side has already moved this turn.
    #[instrument(skip(self), fields(history = self.history.len()))]
    pub fn undo(&mut self) -> GameResult<()> {
        if self.turn.turn_taken {
            warn!(side = ?self.turn.active_side, "Undo refused after a move this turn");
            return Err(GameError::UndoUnavailable);
        }
        let board = self.history.undo().ok_or(GameError::UndoUnavailable)?;
        self.board = board;
        self.turn.turn_taken = false;
        self.turn.last_move = None;
        self.rules.reset_passes();
        info!(history = self.history.len(), "Undo applied");
        Ok(())
    }

    /// Cells where the active side may place.
    pub fn legal_moves(&self) -> Vec<Pos> {
        self.rules.legal_moves(&self.board, self.turn.active_side)
    }

    /// The whole history as a save record.
    pub fn history_record(&self) -> StoredGameRecord {
        StoredGameRecord::History(HistoryRecord::new(
            self.next_to_move(),
            self.history.snapshots().to_vec(),
        ))
    }

    /// The current position as a save record.
    pub fn snapshot_record(&self) -> StoredGameRecord {
        StoredGameRecord::Snapshot(SnapshotRecord::new(self.next_to_move(), self.board.clone()))
    }

    /// Resumes play from a stored record.
    ///
    /// A history record restores every snapshot; a snapshot record starts a
    /// new history at the stored position. Turn bookkeeping is reset.
    ///
    /// # Errors
    ///
    /// [`crate::PersistenceError::TurnMismatch`] unless the stored side to
    /// move is the active side, or
    /// [`crate::PersistenceError::SizeMismatch`] for a different board size.
    #[instrument(skip(self, record), fields(side = ?self.turn.active_side))]
    pub fn resume(&mut self, record: StoredGameRecord) -> GameResult<()> {
        record.check_resumable(self.turn.active_side, self.board.size())?;
        let history = match record {
            StoredGameRecord::History(record) => HistoryManager::from_snapshots(record.boards),
            StoredGameRecord::Snapshot(record) => HistoryManager::from_snapshots(vec![record.board]),
        };
        if let Some(board) = history.latest() {
            self.board = board.clone();
        }
        self.history = history;
        self.turn.turn_taken = false;
        self.turn.last_move = None;
        self.rules.reset_passes();
        info!(history = self.history.len(), "Session resumed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;

    fn session(variant: GameVariant, size: usize) -> GameSession {
        GameSession::new(variant, size, SessionOptions::default()).unwrap()
    }

    #[test]
    fn test_second_move_in_turn_rejected() {
        let mut game = session(GameVariant::Gomoku, 15);
        game.attempt_move(Pos::new(7, 7)).unwrap();
        assert_eq!(
            game.attempt_move(Pos::new(7, 8)),
            Err(GameError::IllegalMove(IllegalReason::TurnAlreadyTaken))
        );
        assert_eq!(game.phase(), TurnPhase::TurnComplete);
    }

    #[test]
    fn test_next_turn_resets_bookkeeping() {
        let mut game = session(GameVariant::Gomoku, 15);
        assert_eq!(game.next_turn_allowed(true), Err(EndTurnRefusal::NoMoveYet));
        game.attempt_move(Pos::new(7, 7)).unwrap();
        assert_eq!(game.turn().last_move, Some(Pos::new(7, 7)));
        assert_eq!(game.next_turn_allowed(true), Ok(()));
        game.begin_next_turn();
        assert_eq!(game.active_side(), Side::White);
        assert!(!game.turn().turn_taken);
        assert_eq!(game.turn().last_move, None);
    }

    #[test]
    fn test_gomoku_cannot_pass() {
        let mut game = session(GameVariant::Gomoku, 15);
        assert_eq!(
            game.pass(),
            Err(GameError::PassNotAllowed {
                variant: GameVariant::Gomoku
            })
        );
    }

    #[test]
    fn test_go_pending_capture_blocks_end_turn() {
        let mut game = session(GameVariant::Go, 9);
        for (black, white) in [((3, 4), (4, 4)), ((5, 4), (0, 0)), ((4, 3), (0, 8))] {
            game.attempt_move(black.into()).unwrap();
            game.begin_next_turn();
            game.attempt_move(white.into()).unwrap();
            game.begin_next_turn();
        }
        game.attempt_move(Pos::new(4, 5)).unwrap();
        assert!(game.has_pending_capture());
        assert_eq!(
            game.next_turn_allowed(true),
            Err(EndTurnRefusal::PendingCapture)
        );
        // A pass-style ending skips the check.
        assert_eq!(game.next_turn_allowed(false), Ok(()));

        assert_eq!(game.capture(), Ok(1));
        assert_eq!(game.get_cell(4, 4), Ok(Cell::Empty));
        assert_eq!(game.next_turn_allowed(true), Ok(()));
        assert_eq!(game.history().latest(), Some(game.board()));
    }

    #[test]
    fn test_auto_capture_option() {
        let options = SessionOptions { auto_capture: true };
        let mut game = GameSession::new(GameVariant::Go, 9, options).unwrap();
        game.attempt_move(Pos::new(0, 1)).unwrap();
        game.begin_next_turn();
        game.attempt_move(Pos::new(0, 0)).unwrap();
        game.begin_next_turn();
        let report = game.attempt_move(Pos::new(1, 0)).unwrap();
        assert_eq!(report.captured, 1);
        assert_eq!(game.get_cell(0, 0), Ok(Cell::Empty));
    }

    #[test]
    fn test_capture_outside_go_rejected() {
        let mut game = session(GameVariant::Othello, 8);
        assert_eq!(
            game.capture(),
            Err(GameError::CaptureNotAllowed {
                variant: GameVariant::Othello
            })
        );
    }

    #[test]
    fn test_go_double_pass_allows_winner_check() {
        let mut game = session(GameVariant::Go, 9);
        game.pass().unwrap();
        assert!(!game.allow_winner_check());
        game.begin_next_turn();
        game.pass().unwrap();
        assert!(game.allow_winner_check());
        assert_eq!(game.outcome(), Some(Outcome::Winner(Side::White)));
    }

    #[test]
    fn test_go_move_clears_pass_flag() {
        let mut game = session(GameVariant::Go, 9);
        game.pass().unwrap();
        game.begin_next_turn();
        game.attempt_move(Pos::new(2, 2)).unwrap();
        game.begin_next_turn();
        game.pass().unwrap();
        assert!(!game.allow_winner_check());
    }

    #[test]
    fn test_pass_after_move_rejected() {
        let mut game = session(GameVariant::Go, 9);
        game.attempt_move(Pos::new(2, 2)).unwrap();
        assert_eq!(
            game.pass(),
            Err(GameError::IllegalMove(IllegalReason::TurnAlreadyTaken))
        );
    }

    #[test]
    fn test_othello_opening_has_no_pass() {
        let mut game = session(GameVariant::Othello, 8);
        assert!(game.pass().is_err());
        assert_eq!(game.legal_moves().len(), 4);
    }

    #[test]
    fn test_undo_restores_previous_own_move() {
        let mut game = session(GameVariant::Gomoku, 15);
        let opening = game.board().clone();
        game.attempt_move(Pos::new(7, 7)).unwrap();
        game.begin_next_turn();
        game.attempt_move(Pos::new(8, 8)).unwrap();
        game.begin_next_turn();

        assert_eq!(game.history().len(), 3);
        game.undo().unwrap();
        assert_eq!(game.board(), &opening);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.active_side(), Side::Black);
        assert_eq!(game.undo(), Err(GameError::UndoUnavailable));
    }

    #[test]
    fn test_undo_refused_after_move_this_turn() {
        let mut game = session(GameVariant::Gomoku, 15);
        game.attempt_move(Pos::new(0, 0)).unwrap();
        game.begin_next_turn();
        game.attempt_move(Pos::new(1, 1)).unwrap();
        game.begin_next_turn();
        game.attempt_move(Pos::new(2, 2)).unwrap();

        assert_eq!(game.undo(), Err(GameError::UndoUnavailable));
        assert_eq!(game.board().count(Side::Black), 2);
        assert_eq!(game.board().count(Side::White), 1);
        assert_eq!(game.history().len(), 4);
        assert_eq!(
            game.attempt_move(Pos::new(3, 3)),
            Err(IllegalReason::TurnAlreadyTaken.into())
        );
    }

    #[test]
    fn test_undo_across_pass_keeps_alternation() {
        let mut game = session(GameVariant::Go, 9);
        game.attempt_move(Pos::new(0, 0)).unwrap();
        game.begin_next_turn();
        game.attempt_move(Pos::new(8, 8)).unwrap();
        game.begin_next_turn();
        game.pass().unwrap();
        game.begin_next_turn();
        game.attempt_move(Pos::new(8, 7)).unwrap();
        game.begin_next_turn();

        assert_eq!(game.history().len(), 5);
        game.undo().unwrap();
        assert_eq!(game.history().len(), 3);
        assert_eq!(game.active_side(), Side::Black);
        assert_eq!(game.get_cell(0, 0), Ok(Cell::Stone(Side::Black)));
        assert_eq!(game.get_cell(8, 8), Ok(Cell::Stone(Side::White)));
        assert_eq!(game.get_cell(8, 7), Ok(Cell::Empty));
    }

    #[test]
    fn test_next_to_move_follows_turn_taken() {
        let mut game = session(GameVariant::Gomoku, 15);
        assert_eq!(game.next_to_move(), Side::Black);
        game.attempt_move(Pos::new(0, 0)).unwrap();
        assert_eq!(game.next_to_move(), Side::White);
    }

    #[test]
    fn test_resume_requires_matching_turn() {
        let mut game = session(GameVariant::Gomoku, 15);
        game.attempt_move(Pos::new(7, 7)).unwrap();
        let record = game.snapshot_record();
        assert_eq!(record.turn_owner(), Side::White);

        let mut fresh = session(GameVariant::Gomoku, 15);
        assert_eq!(
            fresh.resume(record.clone()),
            Err(GameError::Persistence(PersistenceError::TurnMismatch {
                expected: Side::White,
                found: Side::Black
            }))
        );
        fresh.attempt_move(Pos::new(0, 0)).unwrap();
        fresh.begin_next_turn();
        fresh.resume(record).unwrap();
        assert_eq!(fresh.board(), game.board());
        assert_eq!(fresh.history().len(), 1);
        assert!(!fresh.turn().turn_taken);
    }
}
