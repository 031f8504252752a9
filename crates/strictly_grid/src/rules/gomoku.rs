//! Gomoku: first unbroken line of five wins.

use crate::board::Board;
use crate::error::IllegalReason;
use crate::types::{Cell, Pos, Side};
use tracing::{debug, instrument};

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Horizontal, vertical, diagonal, anti-diagonal.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Any empty cell is playable.
pub fn is_legal(pos: Pos, board: &Board, turn_taken: bool) -> Result<(), IllegalReason> {
    super::check_placement(pos, board, turn_taken)
}

/// Places the stone; Gomoku has no secondary effects.
pub fn apply(pos: Pos, board: &mut Board, side: Side) {
    board.put(pos, Cell::Stone(side));
}

/// Counts stones of `side` in an unbroken run through `anchor` along one axis.
///
/// The anchor itself is counted whether or not it holds `side`.
pub fn run_length(board: &Board, anchor: Pos, side: Side, (d_row, d_col): (isize, isize)) -> usize {
    let mut count = 1;
    for sign in [1, -1] {
        let mut cursor = board.step(anchor, d_row * sign, d_col * sign);
        while let Some(pos) = cursor {
            if board.at(pos) != Cell::Stone(side) {
                break;
            }
            count += 1;
            cursor = board.step(pos, d_row * sign, d_col * sign);
        }
    }
    count
}

/// Returns the side owning any line of five or more.
#[instrument(skip(board))]
pub fn check_win(board: &Board) -> Option<Side> {
    for pos in board.positions() {
        let Cell::Stone(side) = board.at(pos) else {
            continue;
        };
        if AXES
            .iter()
            .any(|&axis| run_length(board, pos, side, axis) >= WIN_LENGTH)
        {
            debug!(%pos, ?side, "Five in a row");
            return Some(side);
        }
    }
    None
}

/// A full board with no five-line.
pub fn check_draw(board: &Board) -> bool {
    board.is_full() && check_win(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, side: Side, cells: &[(usize, usize)]) {
        for &(row, col) in cells {
            apply(Pos::new(row, col), board, side);
        }
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new(15).unwrap();
        assert_eq!(check_win(&board), None);
        assert!(!check_draw(&board));
    }

    #[test]
    fn test_winner_each_axis() {
        let lines: [[(usize, usize); 5]; 4] = [
            [(3, 2), (3, 3), (3, 4), (3, 5), (3, 6)],
            [(2, 9), (3, 9), (4, 9), (5, 9), (6, 9)],
            [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)],
            [(4, 10), (5, 9), (6, 8), (7, 7), (8, 6)],
        ];
        for line in lines {
            let mut board = Board::new(15).unwrap();
            place(&mut board, Side::White, &line);
            assert_eq!(check_win(&board), Some(Side::White), "line {line:?}");
        }
    }

    #[test]
    fn test_four_is_not_enough() {
        let mut board = Board::new(15).unwrap();
        place(&mut board, Side::Black, &[(7, 7), (7, 8), (7, 9), (7, 10)]);
        place(&mut board, Side::White, &[(7, 11)]);
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_six_still_wins() {
        let mut board = Board::new(15).unwrap();
        place(
            &mut board,
            Side::Black,
            &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5)],
        );
        assert_eq!(check_win(&board), Some(Side::Black));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // Pairs of columns alternate colour, shifted every row: no run longer than two.
        let mut board = Board::new(8).unwrap();
        for pos in board.positions().collect::<Vec<_>>() {
            let side = if (pos.col / 2 + pos.row) % 2 == 0 {
                Side::Black
            } else {
                Side::White
            };
            apply(pos, &mut board, side);
        }
        assert!(board.is_full());
        assert_eq!(check_win(&board), None);
        assert!(check_draw(&board));
    }

    #[test]
    fn test_run_length_counts_both_ways() {
        let mut board = Board::new(9).unwrap();
        place(&mut board, Side::Black, &[(4, 2), (4, 3), (4, 5)]);
        assert_eq!(run_length(&board, Pos::new(4, 4), Side::Black, (0, 1)), 4);
    }
}
