//! Win detection logic for tic-tac-toe.

use crate::{Grid, Mark};
use tracing::instrument;

/// Every line on the grid, in evaluation order.
///
/// Row `i` is followed by column `i`, then the two diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [0, 3, 6],
    [3, 4, 5],
    [1, 4, 7],
    [6, 7, 8],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the mark filling all three cells of `line`, if any.
fn complete_line(grid: &Grid, [a, b, c]: [usize; 3]) -> Option<Mark> {
    let mark = grid.get(a)?.mark()?;
    (grid.get(b)?.mark() == Some(mark) && grid.get(c)?.mark() == Some(mark)).then_some(mark)
}

/// Checks if there is a winner on the grid.
///
/// If several lines are complete, the last one in [`LINES`] order wins.
/// Valid play never reaches such a grid.
#[instrument(skip(grid))]
pub fn check_winner(grid: &Grid) -> Option<Mark> {
    LINES
        .iter()
        .rev()
        .find_map(|line| complete_line(grid, *line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_grid() {
        assert_eq!(check_winner(&Grid::empty()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let grid = Grid::from_codes(&[1, 1, 1, 2, 2, 0, 0, 0, 0]);
        assert_eq!(check_winner(&grid), Some(Mark::Cross));
    }

    #[test]
    fn test_winner_column() {
        let grid = Grid::from_codes(&[1, 2, 0, 1, 2, 0, 0, 2, 1]);
        assert_eq!(check_winner(&grid), Some(Mark::Nought));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let grid = Grid::from_codes(&[1, 1, 2, 0, 2, 0, 2, 0, 1]);
        assert_eq!(check_winner(&grid), Some(Mark::Nought));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let grid = Grid::from_codes(&[1, 1, 0, 0, 2, 0, 0, 0, 2]);
        assert_eq!(check_winner(&grid), None);
    }

    #[test]
    fn test_last_complete_line_breaks_ties() {
        // Top row Cross, bottom row Nought: unreachable, bottom row is evaluated later.
        let grid = Grid::from_codes(&[1, 1, 1, 0, 0, 0, 2, 2, 2]);
        assert_eq!(check_winner(&grid), Some(Mark::Nought));
    }
}
