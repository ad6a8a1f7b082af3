//! Board contract shared by the search and the concrete games

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Red = 0,
    Blue = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Blue => write!(f, "blue"),
        }
    }
}

/// A line identified by its lattice coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Violations of the board contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board must be at least 1x1 boxes, got {width}x{height}")]
    InvalidSize { width: usize, height: usize },

    #[error("{0} is not a line on this board")]
    OffBoard(Move),

    #[error("line {0} is already claimed")]
    Occupied(Move),

    #[error("cannot undo {requested}: last placed line is {last:?}")]
    UndoOutOfOrder { requested: Move, last: Option<Move> },
}

/// Game state as seen by the search.
///
/// `Clone` must produce an independent deep copy. `place` and `undo` are strictly
/// nested: `undo(m)` inverts the most recent `place(_, m)` and leaves every other
/// query exactly as it was before that `place`.
pub trait Board: Clone {
    /// Legal moves, best-first in whatever order the board considers promising
    fn ordered_moves(&self) -> Vec<Move>;

    /// Apply `mv` for `side`; returns true when `side` keeps the turn
    fn place(&mut self, side: Side, mv: Move) -> Result<bool, BoardError>;

    /// Take back the most recently placed move
    fn undo(&mut self, mv: Move) -> Result<(), BoardError>;

    fn is_game_over(&self) -> bool;

    fn score(&self, side: Side) -> i32;
}
