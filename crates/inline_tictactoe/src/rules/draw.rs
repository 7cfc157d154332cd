//! Draw detection logic for tic-tac-toe.

use super::win::check_winner;
use crate::{Cell, Grid};
use tracing::instrument;

/// Checks if the grid is full (no empty cell).
#[instrument(skip(grid))]
pub fn is_full(grid: &Grid) -> bool {
    grid.cells().iter().all(|cell| *cell != Cell::Empty)
}

/// A full grid with no complete line.
#[instrument(skip(grid))]
pub fn is_draw(grid: &Grid) -> bool {
    is_full(grid) && check_winner(grid).is_none()
}
