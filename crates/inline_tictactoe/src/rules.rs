//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Grid`](crate::Grid). Rules are kept apart from
//! grid storage so the state machine can compose them.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};

use crate::{GameStatus, Grid};

/// Derives the status of a grid. A win is reported even when the grid is full.
pub fn status(grid: &Grid) -> GameStatus {
    match check_winner(grid) {
        Some(mark) => GameStatus::Won(mark),
        None if is_full(grid) => GameStatus::Draw,
        None => GameStatus::InProgress,
    }
}
