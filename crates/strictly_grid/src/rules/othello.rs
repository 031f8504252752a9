//! Othello: flank opposing discs to flip them.

use crate::board::Board;
use crate::error::IllegalReason;
use crate::types::{Cell, Pos, Side};
use tracing::{debug, instrument};

/// All eight compass directions.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Places the four centre discs: White on the main diagonal, Black on the other.
pub fn setup(board: &mut Board) {
    let center = board.size() / 2;
    board.put(Pos::new(center - 1, center - 1), Cell::Stone(Side::White));
    board.put(Pos::new(center - 1, center), Cell::Stone(Side::Black));
    board.put(Pos::new(center, center - 1), Cell::Stone(Side::Black));
    board.put(Pos::new(center, center), Cell::Stone(Side::White));
}

/// Opposing discs flipped in one direction by placing at `pos`.
fn flippable_in(board: &Board, pos: Pos, side: Side, (d_row, d_col): (isize, isize)) -> Vec<Pos> {
    let mut run = Vec::new();
    let mut cursor = board.step(pos, d_row, d_col);
    while let Some(next) = cursor {
        match board.at(next) {
            Cell::Stone(owner) if owner == side.opponent() => run.push(next),
            Cell::Stone(_) => return run,
            Cell::Empty => break,
        }
        cursor = board.step(next, d_row, d_col);
    }
    Vec::new()
}

/// Every opposing disc `side` would flip by placing at `pos`.
pub fn flippable(board: &Board, pos: Pos, side: Side) -> Vec<Pos> {
    DIRECTIONS
        .iter()
        .flat_map(|&direction| flippable_in(board, pos, side, direction))
        .collect()
}

/// Legal iff the shared checks pass and at least one disc flips.
pub fn is_legal(pos: Pos, board: &Board, side: Side, turn_taken: bool) -> Result<(), IllegalReason> {
    super::check_placement(pos, board, turn_taken)?;
    if flippable(board, pos, side).is_empty() {
        return Err(IllegalReason::NoFlip);
    }
    Ok(())
}

/// Places the disc and flips every flanked run. Returns the flipped cells.
#[instrument(skip(board))]
pub fn apply(pos: Pos, board: &mut Board, side: Side) -> Vec<Pos> {
    let flipped = flippable(board, pos, side);
    board.put(pos, Cell::Stone(side));
    for &cell in &flipped {
        board.put(cell, Cell::Stone(side));
    }
    debug!(%pos, ?side, flipped = flipped.len(), "Flipped discs");
    flipped
}

/// True if `side` has any legal placement.
pub fn has_valid_moves(board: &Board, side: Side) -> bool {
    board
        .positions()
        .any(|pos| board.at(pos).is_empty() && !flippable(board, pos, side).is_empty())
}

/// No empty cell left, or neither side can move.
pub fn is_terminal(board: &Board) -> bool {
    board.is_full() || (!has_valid_moves(board, Side::Black) && !has_valid_moves(board, Side::White))
}

/// The side with strictly more discs.
pub fn check_win(board: &Board) -> Option<Side> {
    let (black, white) = (board.count(Side::Black), board.count(Side::White));
    match black.cmp(&white) {
        std::cmp::Ordering::Greater => Some(Side::Black),
        std::cmp::Ordering::Less => Some(Side::White),
        std::cmp::Ordering::Equal => None,
    }
}

/// Equal disc counts.
pub fn check_draw(board: &Board) -> bool {
    board.count(Side::Black) == board.count(Side::White)
}
