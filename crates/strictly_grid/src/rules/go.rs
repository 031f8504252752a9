//! Go: liberty-based capture and area scoring.
//!
//! Legality is probed on a scratch copy of the board so the live board is
//! never left holding a speculative stone.

use crate::board::Board;
use crate::error::IllegalReason;
use crate::types::{Cell, Pos, Side};
use std::collections::VecDeque;
use tracing::{debug, info, instrument};

/// Compensation awarded to White.
pub const KOMI: f64 = 3.25;

/// Maximal 4-connected set of cells sharing `start`'s state.
///
/// For a stone this is its group; for an empty cell, its empty region.
/// `start` is always the first element.
pub fn region(board: &Board, start: Pos) -> Vec<Pos> {
    let target = board.at(start);
    let mut seen = vec![false; board.size() * board.size()];
    let mut members = Vec::new();
    let mut queue = VecDeque::from([start]);
    seen[start.row * board.size() + start.col] = true;

    while let Some(pos) = queue.pop_front() {
        members.push(pos);
        for next in board.neighbors(pos) {
            let index = next.row * board.size() + next.col;
            if !seen[index] && board.at(next) == target {
                seen[index] = true;
                queue.push_back(next);
            }
        }
    }
    members
}

/// True iff some member of `group` touches an empty cell.
pub fn has_liberty(board: &Board, group: &[Pos]) -> bool {
    group
        .iter()
        .any(|&pos| board.neighbors(pos).any(|next| board.at(next).is_empty()))
}

/// Enemy groups adjacent to `pos` that have no liberty, without duplicates.
pub fn capturable_groups(board: &Board, pos: Pos, side: Side) -> Vec<Vec<Pos>> {
    let enemy = Cell::Stone(side.opponent());
    let mut groups: Vec<Vec<Pos>> = Vec::new();
    for next in board.neighbors(pos) {
        if board.at(next) != enemy || groups.iter().any(|group| group.contains(&next)) {
            continue;
        }
        let group = region(board, next);
        if !has_liberty(board, &group) {
            groups.push(group);
        }
    }
    groups
}

/// True while an enemy group next to `pos` sits without liberty.
pub fn has_pending_capture(board: &Board, pos: Pos, side: Side) -> bool {
    !capturable_groups(board, pos, side).is_empty()
}

/// Legal iff the shared checks pass and the stone either keeps a liberty
/// or takes the last liberty of an adjacent enemy group.
#[instrument(skip(board))]
pub fn is_legal(pos: Pos, board: &Board, side: Side, turn_taken: bool) -> Result<(), IllegalReason> {
    super::check_placement(pos, board, turn_taken)?;

    let mut probe = board.clone();
    probe.put(pos, Cell::Stone(side));
    if has_liberty(&probe, &region(&probe, pos)) {
        return Ok(());
    }
    if has_pending_capture(&probe, pos, side) {
        debug!(%pos, "No liberty, but placement captures");
        return Ok(());
    }
    Err(IllegalReason::Suicide)
}

/// Places the stone. Captures are resolved by [`capture`].
pub fn apply(pos: Pos, board: &mut Board, side: Side) {
    board.put(pos, Cell::Stone(side));
}

/// Removes every enemy group adjacent to `pos` that has no liberty.
///
/// Returns the number of stones removed.
#[instrument(skip(board))]
pub fn capture(board: &mut Board, pos: Pos, side: Side) -> usize {
    let mut removed = 0;
    for group in capturable_groups(board, pos, side) {
        removed += group.len();
        for stone in group {
            board.put(stone, Cell::Empty);
        }
    }
    if removed > 0 {
        info!(%pos, ?side, removed, "Captured stones");
    }
    removed
}

/// End-of-game cleanup: removes every group, of either colour, without liberty.
///
/// Groups are collected before any removal so one removal cannot rescue another.
pub fn remove_dead(board: &mut Board) -> usize {
    let mut visited = vec![false; board.size() * board.size()];
    let mut dead = Vec::new();
    for pos in board.positions() {
        if board.at(pos).is_empty() || visited[pos.row * board.size() + pos.col] {
            continue;
        }
        let group = region(board, pos);
        for member in &group {
            visited[member.row * board.size() + member.col] = true;
        }
        if !has_liberty(board, &group) {
            dead.extend(group);
        }
    }
    for &pos in &dead {
        board.put(pos, Cell::Empty);
    }
    dead.len()
}

/// Area totals for both sides, komi included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Black stones plus Black territory.
    pub black: f64,
    /// White stones plus White territory plus komi.
    pub white: f64,
}

impl Score {
    /// The side ahead, or `None` on an exact tie.
    pub fn leader(&self) -> Option<Side> {
        if self.black > self.white {
            Some(Side::Black)
        } else if self.white > self.black {
            Some(Side::White)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BLACK {} : WHITE {}", self.black, self.white)
    }
}

/// Area score of `board` after removing groups without liberty.
///
/// An empty region counts for a side only when every stone bordering it is
/// that side's.
#[instrument(skip(board))]
pub fn score(board: &Board) -> Score {
    let mut board = board.clone();
    remove_dead(&mut board);

    let mut black = board.count(Side::Black) as f64;
    let mut white = board.count(Side::White) as f64 + KOMI;

    let mut visited = vec![false; board.size() * board.size()];
    for pos in board.positions() {
        if !board.at(pos).is_empty() || visited[pos.row * board.size() + pos.col] {
            continue;
        }
        let area = region(&board, pos);
        let mut borders = (false, false);
        for &member in &area {
            visited[member.row * board.size() + member.col] = true;
            for next in board.neighbors(member) {
                match board.at(next) {
                    Cell::Stone(Side::Black) => borders.0 = true,
                    Cell::Stone(Side::White) => borders.1 = true,
                    Cell::Empty => {}
                }
            }
        }
        match borders {
            (true, false) => black += area.len() as f64,
            (false, true) => white += area.len() as f64,
            _ => {}
        }
    }

    debug!(black, white, "Scored board");
    Score { black, white }
}

/// The side with the higher area score.
pub fn check_win(board: &Board) -> Option<Side> {
    score(board).leader()
}

/// Exactly equal scores after komi.
pub fn check_draw(board: &Board) -> bool {
    score(board).leader().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(black: &[(usize, usize)], white: &[(usize, usize)]) -> Board {
        let mut board = Board::new(9).unwrap();
        for &(row, col) in black {
            board.put(Pos::new(row, col), Cell::Stone(Side::Black));
        }
        for &(row, col) in white {
            board.put(Pos::new(row, col), Cell::Stone(Side::White));
        }
        board
    }

    #[test]
    fn test_region_is_connected_group() {
        let board = board_with(&[(0, 0), (0, 1), (1, 1), (3, 3)], &[]);
        let mut group = region(&board, Pos::new(0, 0));
        group.sort();
        assert_eq!(group, vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(1, 1)]);
    }

    #[test]
    fn test_liberty_detection() {
        let board = board_with(&[(0, 0)], &[(0, 1), (1, 0)]);
        assert!(!has_liberty(&board, &region(&board, Pos::new(0, 0))));
        assert!(has_liberty(&board, &region(&board, Pos::new(0, 1))));
    }

    #[test]
    fn test_suicide_rejected() {
        // White at (4,4) would be surrounded by Black stones that keep liberties.
        let board = board_with(&[(3, 4), (5, 4), (4, 3), (4, 5)], &[]);
        assert_eq!(
            is_legal(Pos::new(4, 4), &board, Side::White, false),
            Err(IllegalReason::Suicide)
        );
        // The probe never touches the live board.
        assert_eq!(board.at(Pos::new(4, 4)), Cell::Empty);
    }

    #[test]
    fn test_no_liberty_placement_legal_when_capturing() {
        // Black stone at (0,0) has one liberty left at (1,0)...
        // White playing (1,0) has no liberty itself but captures (0,0).
        let board = board_with(&[(0, 0), (2, 0), (1, 1)], &[(0, 1)]);
        assert_eq!(is_legal(Pos::new(1, 0), &board, Side::White, false), Ok(()));

        let mut board = board;
        apply(Pos::new(1, 0), &mut board, Side::White);
        assert_eq!(capture(&mut board, Pos::new(1, 0), Side::White), 1);
        assert_eq!(board.at(Pos::new(0, 0)), Cell::Empty);
        assert_eq!(board.at(Pos::new(1, 0)), Cell::Stone(Side::White));
    }

    #[test]
    fn test_apply_does_not_capture_by_itself() {
        let mut board = board_with(&[(3, 4), (5, 4), (4, 3)], &[(4, 4)]);
        apply(Pos::new(4, 5), &mut board, Side::Black);
        assert_eq!(board.at(Pos::new(4, 4)), Cell::Stone(Side::White));
        assert!(has_pending_capture(&board, Pos::new(4, 5), Side::Black));
    }

    #[test]
    fn test_capture_removes_whole_group() {
        let mut board = board_with(
            &[(0, 2), (1, 2), (2, 0), (2, 1)],
            &[(0, 0), (0, 1), (1, 0), (1, 1)],
        );
        assert_eq!(capture(&mut board, Pos::new(2, 1), Side::Black), 4);
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert!(board.at(Pos::new(row, col)).is_empty());
        }
    }

    #[test]
    fn test_capture_counts_shared_group_once() {
        // The White corner touches the new Black stone at (1,1) on two sides.
        let mut board = board_with(&[(0, 2), (2, 0), (1, 1)], &[(0, 0), (0, 1), (1, 0)]);
        assert_eq!(capture(&mut board, Pos::new(1, 1), Side::Black), 3);
    }

    #[test]
    fn test_score_counts_territory_and_komi() {
        // Black wall on column 4 splits the 9x9 board; White wall on column 5.
        let black: Vec<_> = (0..9).map(|row| (row, 4)).collect();
        let white: Vec<_> = (0..9).map(|row| (row, 5)).collect();
        let board = board_with(&black, &white);
        let score = score(&board);
        assert_eq!(score.black, 9.0 + 36.0);
        assert_eq!(score.white, 9.0 + 27.0 + KOMI);
        assert_eq!(check_win(&board), Some(Side::Black));
        assert!(!check_draw(&board));
    }

    #[test]
    fn test_empty_board_goes_to_white_on_komi() {
        let board = Board::new(9).unwrap();
        assert_eq!(check_win(&board), Some(Side::White));
    }

    #[test]
    fn test_score_sweeps_dead_groups_first() {
        let board = board_with(&[(3, 4), (5, 4), (4, 3), (4, 5)], &[(4, 4)]);
        let mut swept = board.clone();
        assert_eq!(remove_dead(&mut swept), 1);
        assert!(swept.at(Pos::new(4, 4)).is_empty());
        // Scoring works on a copy.
        let _ = score(&board);
        assert_eq!(board.at(Pos::new(4, 4)), Cell::Stone(Side::White));
    }
}
