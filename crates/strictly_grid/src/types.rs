//! Core domain types shared by every variant.

use serde::{Deserialize, Serialize};

/// One of the two sides at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Side {
    /// Black (moves first).
    Black,
    /// White.
    White,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

/// State of a single intersection / square.
///
/// Persisted as `null`, `"BLACK"` or `"WHITE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Side>", into = "Option<Side>")]
pub enum Cell {
    /// Nothing placed here.
    #[default]
    Empty,
    /// A stone or disc of the given side.
    Stone(Side),
}

impl Cell {
    /// Returns the owning side, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Stone(side) => Some(side),
        }
    }

    /// True for [`Cell::Empty`].
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Option<Side>> for Cell {
    fn from(side: Option<Side>) -> Self {
        side.map_or(Cell::Empty, Cell::Stone)
    }
}

impl From<Cell> for Option<Side> {
    fn from(cell: Cell) -> Self {
        cell.side()
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        Cell::Stone(side)
    }
}

/// A resolved board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_new::new)]
pub struct Pos {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl Pos {
    /// Steps by a signed offset, returning `None` on underflow.
    ///
    /// The result is not bounds-checked against any board.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Pos> {
        Some(Pos {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Pos { row, col }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Which game is being played on the grid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GameVariant {
    /// Five in a row.
    Gomoku,
    /// Go with liberty-based capture and area scoring.
    Go,
    /// Othello / Reversi.
    Othello,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// One side won.
    Winner(Side),
    /// Nobody won.
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(side) => write!(f, "{side} wins!"),
            Outcome::Draw => write!(f, "Draw!"),
        }
    }
}
