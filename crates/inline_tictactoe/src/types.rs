//! Core domain types for the 3x3 grid.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::rules;

/// A mark a player places in a cell.
///
/// `Cross` is the first mark (code `1`), `Nought` the second (code `2`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// First mark.
    #[display("❌")]
    Cross,
    /// Second mark.
    #[display("⭕")]
    Nought,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Cross => Mark::Nought,
            Mark::Nought => Mark::Cross,
        }
    }

    /// Integer code used by the persisted raw grid.
    pub fn code(self) -> u8 {
        match self {
            Mark::Cross => 1,
            Mark::Nought => 2,
        }
    }
}

/// One of the nine positions on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Occupied by a mark.
    Marked(Mark),
}

impl Cell {
    /// Decodes a raw cell code. Unknown codes decode to `Empty`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Cell::Marked(Mark::Cross),
            2 => Cell::Marked(Mark::Nought),
            _ => Cell::Empty,
        }
    }

    /// Encodes the cell as its raw code (`0`, `1` or `2`).
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Marked(mark) => mark.code(),
        }
    }

    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }

    /// Checks whether the cell is empty.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Status of a grid, derived from its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// No complete line and at least one empty cell.
    InProgress,
    /// A line is complete.
    Won(Mark),
    /// Every cell is filled and no line is complete.
    Draw,
}

impl GameStatus {
    /// Returns true unless the game is still in progress.
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// 3x3 grid, cells in row-major order (0-8).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [Cell; Grid::SIZE],
}

impl Grid {
    /// Number of cells on the grid.
    pub const SIZE: usize = 9;

    /// Builds a grid from an ordered sequence of cells.
    ///
    /// Any sequence that is not exactly nine cells long yields an empty grid.
    #[instrument(skip(cells))]
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        let cells: Vec<Cell> = cells.into_iter().collect();
        match <[Cell; Grid::SIZE]>::try_from(cells) {
            Ok(cells) => Self { cells },
            Err(rejected) => {
                debug!(len = rejected.len(), "Malformed grid normalized to empty");
                Self::empty()
            }
        }
    }

    /// Creates a grid with nine empty cells.
    pub fn empty() -> Self {
        Self {
            cells: [Cell::Empty; Grid::SIZE],
        }
    }

    /// Builds a grid from raw cell codes (`0` empty, `1` first mark, `2` second mark).
    pub fn from_codes(codes: &[i64]) -> Self {
        Self::new(codes.iter().copied().map(Cell::from_code))
    }

    /// Returns the raw cell codes.
    pub fn codes(&self) -> [u8; Grid::SIZE] {
        self.cells.map(Cell::code)
    }

    /// Gets the cell at the given index.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks whether the cell at `index` exists and is empty.
    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; Grid::SIZE] {
        &self.cells
    }

    /// Counts the empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    /// Places a mark. The caller has already checked bounds and emptiness.
    pub(crate) fn place(&mut self, index: usize, mark: Mark) {
        self.cells[index] = Cell::Marked(mark);
    }

    /// True when no cell is empty.
    pub fn has_ended(&self) -> bool {
        rules::is_full(self)
    }

    /// Returns the mark owning a complete line, if any.
    pub fn winner(&self) -> Option<Mark> {
        rules::check_winner(self)
    }

    /// Derives the grid status. A completed line takes precedence over a full grid.
    pub fn status(&self) -> GameStatus {
        rules::status(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_normalizes_to_empty() {
        let grid = Grid::new(vec![Cell::Marked(Mark::Cross); 4]);
        assert_eq!(grid, Grid::empty());
    }

    #[test]
    fn test_long_input_normalizes_to_empty() {
        let grid = Grid::new(vec![Cell::Marked(Mark::Nought); 10]);
        assert_eq!(grid.empty_count(), 9);
    }

    #[test]
    fn test_zero_length_input_normalizes_to_empty() {
        assert_eq!(Grid::new(Vec::new()), Grid::empty());
    }

    #[test]
    fn test_codes_round_through_cells() {
        let grid = Grid::from_codes(&[1, 0, 2, 0, 1, 0, 2, 0, 0]);
        assert_eq!(grid.get(0), Some(Cell::Marked(Mark::Cross)));
        assert_eq!(grid.get(2), Some(Cell::Marked(Mark::Nought)));
        assert_eq!(grid.codes(), [1, 0, 2, 0, 1, 0, 2, 0, 0]);
    }

    #[test]
    fn test_unknown_codes_become_empty() {
        let grid = Grid::from_codes(&[7, -1, 0, 0, 0, 0, 0, 0, 3]);
        assert_eq!(grid, Grid::empty());
    }

    #[test]
    fn test_out_of_range_index_is_not_empty() {
        let grid = Grid::empty();
        assert!(grid.is_empty_at(8));
        assert!(!grid.is_empty_at(9));
        assert_eq!(grid.get(9), None);
    }

    #[test]
    fn test_mark_codes() {
        assert_eq!(Mark::Cross.code(), 1);
        assert_eq!(Mark::Nought.code(), 2);
        assert_eq!(Mark::Cross.opponent(), Mark::Nought);
        assert_eq!(Mark::Cross.to_string(), "❌");
    }
}
