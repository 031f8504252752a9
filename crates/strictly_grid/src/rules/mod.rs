//! Game rules for every supported variant.
//!
//! Each variant module holds pure functions over a [`Board`]. [`RuleSet`]
//! is the closed set of variants, dispatched by `match` so adding a variant
//! forces every operation to handle it.

pub mod go;
pub mod gomoku;
pub mod othello;

use crate::board::Board;
use crate::error::IllegalReason;
use crate::types::{Cell, GameVariant, Pos, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Checks shared by every variant: turn not yet taken, on the board, empty.
pub(crate) fn check_placement(
    pos: Pos,
    board: &Board,
    turn_taken: bool,
) -> Result<(), IllegalReason> {
    if turn_taken {
        return Err(IllegalReason::TurnAlreadyTaken);
    }
    if !board.contains(pos) {
        return Err(IllegalReason::OutOfBounds {
            row: pos.row,
            col: pos.col,
        });
    }
    if board.at(pos) != Cell::Empty {
        return Err(IllegalReason::Occupied);
    }
    Ok(())
}

/// Whether each side's most recent turn in Go was a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassState {
    /// Black passed on its last turn.
    pub black_passed_last_turn: bool,
    /// White passed on its last turn.
    pub white_passed_last_turn: bool,
}

impl PassState {
    /// Records whether `side` passed on the turn it just played.
    pub fn record(&mut self, side: Side, passed: bool) {
        match side {
            Side::Black => self.black_passed_last_turn = passed,
            Side::White => self.white_passed_last_turn = passed,
        }
    }

    /// True when both sides passed in immediate succession.
    pub fn both_passed(&self) -> bool {
        self.black_passed_last_turn && self.white_passed_last_turn
    }
}

/// The rules in force for a session, with each variant's own turn state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleSet {
    /// Five in a row wins.
    Gomoku,
    /// Liberty capture and area scoring.
    Go(PassState),
    /// Flanking flips, most discs wins.
    Othello,
}

impl RuleSet {
    /// Fresh rules for a variant.
    pub fn for_variant(variant: GameVariant) -> Self {
        match variant {
            GameVariant::Gomoku => RuleSet::Gomoku,
            GameVariant::Go => RuleSet::Go(PassState::default()),
            GameVariant::Othello => RuleSet::Othello,
        }
    }

    /// The variant these rules implement.
    pub fn variant(&self) -> GameVariant {
        match self {
            RuleSet::Gomoku => GameVariant::Gomoku,
            RuleSet::Go(_) => GameVariant::Go,
            RuleSet::Othello => GameVariant::Othello,
        }
    }

    /// Places the variant's opening layout on an empty board.
    #[instrument(skip(board))]
    pub fn setup(&self, board: &mut Board) {
        if let RuleSet::Othello = self {
            othello::setup(board);
        }
    }

    /// Decides whether `side` may place at `pos`.
    ///
    /// Never mutates `board`.
    #[instrument(skip(self, board), fields(variant = %self.variant()))]
    pub fn is_legal(
        &self,
        pos: Pos,
        board: &Board,
        side: Side,
        turn_taken: bool,
    ) -> Result<(), IllegalReason> {
        let verdict = match self {
            RuleSet::Gomoku => gomoku::is_legal(pos, board, turn_taken),
            RuleSet::Go(_) => go::is_legal(pos, board, side, turn_taken),
            RuleSet::Othello => othello::is_legal(pos, board, side, turn_taken),
        };
        if let Err(reason) = verdict {
            debug!(%pos, ?side, %reason, "Placement rejected");
        }
        verdict
    }

    /// Places a stone and performs the variant's immediate side effects.
    ///
    /// Returns the cells changed besides `pos` (Othello flips). Go captures
    /// are resolved separately through [`go::capture`]. Callers must have
    /// checked [`RuleSet::is_legal`] first.
    #[instrument(skip(self, board), fields(variant = %self.variant()))]
    pub fn apply(&self, pos: Pos, board: &mut Board, side: Side) -> Vec<Pos> {
        match self {
            RuleSet::Gomoku => {
                gomoku::apply(pos, board, side);
                Vec::new()
            }
            RuleSet::Go(_) => {
                go::apply(pos, board, side);
                Vec::new()
            }
            RuleSet::Othello => othello::apply(pos, board, side),
        }
    }

    /// The winner, if the position decides one.
    #[instrument(skip_all, fields(variant = %self.variant()))]
    pub fn check_win(&self, board: &Board) -> Option<Side> {
        match self {
            RuleSet::Gomoku => gomoku::check_win(board),
            RuleSet::Go(_) => go::check_win(board),
            RuleSet::Othello => othello::check_win(board),
        }
    }

    /// True when the position is a draw.
    ///
    /// Go: only after both sides passed in succession with equal scores.
    #[instrument(skip_all, fields(variant = %self.variant()))]
    pub fn check_draw(&self, board: &Board) -> bool {
        match self {
            RuleSet::Gomoku => gomoku::check_draw(board),
            RuleSet::Go(passes) => passes.both_passed() && go::check_draw(board),
            RuleSet::Othello => othello::check_draw(board),
        }
    }

    /// Whether a winner check is meaningful right now.
    ///
    /// Gomoku: always. Go: only after both sides passed in succession.
    /// Othello: once the game is terminal.
    pub fn allow_winner_check(&self, board: &Board) -> bool {
        match self {
            RuleSet::Gomoku => true,
            RuleSet::Go(passes) => passes.both_passed(),
            RuleSet::Othello => othello::is_terminal(board),
        }
    }

    /// Whether `side` may pass instead of placing.
    pub fn may_pass(&self, board: &Board, side: Side) -> bool {
        match self {
            RuleSet::Gomoku => false,
            RuleSet::Go(_) => true,
            RuleSet::Othello => !othello::has_valid_moves(board, side),
        }
    }

    /// Records whether `side` passed on its turn (Go only).
    pub fn record_pass(&mut self, side: Side, passed: bool) {
        if let RuleSet::Go(passes) = self {
            passes.record(side, passed);
        }
    }

    /// Clears Go pass bookkeeping.
    pub fn reset_passes(&mut self) {
        if let RuleSet::Go(passes) = self {
            *passes = PassState::default();
        }
    }

    /// Every cell where `side` may place on `board`, row-major.
    #[instrument(skip(self, board))]
    pub fn legal_moves(&self, board: &Board, side: Side) -> Vec<Pos> {
        board
            .positions()
            .filter(|&pos| match self {
                RuleSet::Gomoku => gomoku::is_legal(pos, board, false).is_ok(),
                RuleSet::Go(_) => go::is_legal(pos, board, side, false).is_ok(),
                RuleSet::Othello => othello::is_legal(pos, board, side, false).is_ok(),
            })
            .collect()
    }
}
