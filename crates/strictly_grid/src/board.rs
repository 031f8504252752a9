//! Square grid of cells with bounds-checked access.
//!
//! The board knows nothing about rules. Cells are kept in an [`im::Vector`]
//! so cloning a board (for history snapshots or legality probes) shares
//! structure instead of copying every cell; later writes to either copy
//! never show up in the other.

use crate::error::{GameError, GameResult};
use crate::types::{Cell, Pos, Side};
use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Smallest supported board.
pub const MIN_BOARD_SIZE: usize = 8;

/// Largest supported board.
pub const MAX_BOARD_SIZE: usize = 19;

/// The four orthogonal steps.
pub(crate) const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A `size`×`size` grid of [`Cell`]s.
///
/// Persisted as a row-major list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    size: usize,
    cells: Vector<Cell>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidBoardSize`] outside 8..=19.
    #[instrument]
    pub fn new(size: usize) -> GameResult<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(GameError::InvalidBoardSize { size });
        }
        Ok(Self {
            size,
            cells: std::iter::repeat_n(Cell::Empty, size * size).collect(),
        })
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// True iff `0 <= row < size` and `0 <= col < size`.
    pub fn is_within_board(&self, row: isize, col: isize) -> bool {
        let size = self.size as isize;
        (0..size).contains(&row) && (0..size).contains(&col)
    }

    /// True iff `pos` lies on the board.
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Reads a cell.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] for coordinates off the board.
    pub fn get(&self, row: usize, col: usize) -> GameResult<Cell> {
        let pos = self.checked(row, col)?;
        Ok(self.at(pos))
    }

    /// Writes a cell.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] for coordinates off the board.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> GameResult<()> {
        let pos = self.checked(row, col)?;
        self.put(pos, cell);
        Ok(())
    }

    fn checked(&self, row: usize, col: usize) -> GameResult<Pos> {
        let pos = Pos::new(row, col);
        if self.contains(pos) {
            Ok(pos)
        } else {
            Err(GameError::OutOfBounds {
                row,
                col,
                size: self.size,
            })
        }
    }

    fn index(&self, pos: Pos) -> usize {
        debug_assert!(self.contains(pos), "{pos} is off a {} board", self.size);
        pos.row * self.size + pos.col
    }

    /// Reads a cell already known to be on the board.
    pub(crate) fn at(&self, pos: Pos) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Writes a cell already known to be on the board.
    pub(crate) fn put(&mut self, pos: Pos, cell: Cell) {
        let index = self.index(pos);
        self.cells.set(index, cell);
    }

    /// Every coordinate in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Pos::new(row, col)))
    }

    /// Moves one step from `pos`, staying on the board.
    pub fn step(&self, pos: Pos, d_row: isize, d_col: isize) -> Option<Pos> {
        pos.offset(d_row, d_col).filter(|next| self.contains(*next))
    }

    /// Orthogonal neighbours of `pos` that are on the board.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        ORTHOGONAL
            .iter()
            .filter_map(move |&(d_row, d_col)| self.step(pos, d_row, d_col))
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Number of stones belonging to `side`.
    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Cell::Stone(side))
            .count()
    }

    /// Row-major copy of the grid, the form handed to renderers and save files.
    pub fn to_grid(&self) -> Vec<Vec<Cell>> {
        self.cells
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .chunks(self.size)
            .map(<[Cell]>::to_vec)
            .collect()
    }

    /// Builds a board from a row-major grid.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidBoardSize`] if the grid is not square or
    /// its size is unsupported.
    pub fn from_grid(grid: Vec<Vec<Cell>>) -> GameResult<Self> {
        let size = grid.len();
        let mut board = Self::new(size)?;
        for (row, cells) in grid.into_iter().enumerate() {
            if cells.len() != size {
                return Err(GameError::InvalidBoardSize { size: cells.len() });
            }
            for (col, cell) in cells.into_iter().enumerate() {
                board.put(Pos::new(row, col), cell);
            }
        }
        Ok(board)
    }

    /// Formats the board with row and column indices.
    pub fn display(&self) -> String {
        let mut result = String::from("   ");
        for col in 0..self.size {
            result.push_str(&format!("{col:>3}"));
        }
        result.push('\n');
        for row in 0..self.size {
            result.push_str(&format!("{row:>3}"));
            for col in 0..self.size {
                let symbol = match self.at(Pos::new(row, col)) {
                    Cell::Empty => '·',
                    Cell::Stone(Side::Black) => '●',
                    Cell::Stone(Side::White) => '○',
                };
                result.push_str(&format!("{symbol:>3}"));
            }
            result.push('\n');
        }
        result
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = GameError;

    fn try_from(grid: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Self::from_grid(grid)
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.to_grid()
    }
}
