//! Property tests for board bounds and Go region flood fill.

use proptest::prelude::*;
use strictly_grid::rules::go;
use strictly_grid::{Board, Cell, Pos, Side};

fn board_strategy() -> impl Strategy<Value = Board> {
    (8usize..=19)
        .prop_flat_map(|size| {
            (
                Just(size),
                prop::collection::vec(prop_oneof![Just(0u8), Just(1u8), Just(2u8)], size * size),
            )
        })
        .prop_map(|(size, cells)| {
            let mut board = Board::new(size).expect("Size in range");
            for (index, cell) in cells.into_iter().enumerate() {
                let cell = match cell {
                    1 => Cell::Stone(Side::Black),
                    2 => Cell::Stone(Side::White),
                    _ => Cell::Empty,
                };
                board
                    .set(index / size, index % size, cell)
                    .expect("Index in range");
            }
            board
        })
}

proptest! {
    #[test]
    fn prop_within_board_matches_range(size in 8usize..=19, row in -3isize..25, col in -3isize..25) {
        let board = Board::new(size).expect("Size in range");
        let expected = (0..size as isize).contains(&row) && (0..size as isize).contains(&col);
        prop_assert_eq!(board.is_within_board(row, col), expected);
        if row >= 0 && col >= 0 {
            prop_assert_eq!(board.get(row as usize, col as usize).is_ok(), expected);
        }
    }

    #[test]
    fn prop_region_is_closed_and_uniform(board in board_strategy(), seed in any::<usize>()) {
        let cells = board.size() * board.size();
        let start = Pos::new((seed % cells) / board.size(), seed % board.size());
        let target = board.get(start.row, start.col).expect("Start on board");
        let region = go::region(&board, start);

        prop_assert_eq!(region[0], start);
        for &pos in &region {
            prop_assert_eq!(board.get(pos.row, pos.col).expect("On board"), target);
            // Closure: every same-state neighbour is already in the region.
            for next in board.neighbors(pos) {
                if board.get(next.row, next.col).expect("On board") == target {
                    prop_assert!(region.contains(&next));
                }
            }
        }
        let mut unique = region.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), region.len());
    }
}
