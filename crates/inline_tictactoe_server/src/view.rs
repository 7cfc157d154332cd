//! Read-only view of a game and its text rendering.
//!
//! The view carries everything a presentation layer needs: every cell, both
//! seats with their names and marks, whose turn it is and how the game
//! stands. The `render_*` helpers turn it into the emoji text the bot posts.

use derive_getters::Getters;
use inline_tictactoe::{Cell, GameId, GameState, GameStatus, Grid, Mark, Phase, PlayerSlot};
use serde::Serialize;
use tracing::instrument;

use crate::callback::CallbackData;
use crate::record::UNBOUND_NAME;

const EMPTY_SYMBOL: &str = "⬜";
const HAND: &str = "👈";
const WINNER: &str = "🤩";
const LOSER: &str = "😭";
const DRAW: &str = "😡";

/// One seat as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct SeatView {
    slot: PlayerSlot,
    name: String,
    mark: Mark,
    bound: bool,
}

/// Snapshot of a game for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct GameStateView {
    game_id: GameId,
    cells: [Cell; Grid::SIZE],
    seats: [SeatView; 2],
    to_move: PlayerSlot,
    status: GameStatus,
    winner: Option<PlayerSlot>,
    phase: Phase,
}

impl From<&GameState> for GameStateView {
    fn from(state: &GameState) -> Self {
        let seat = |slot: PlayerSlot| {
            let player = state.player(slot);
            SeatView {
                slot,
                name: player
                    .map(|p| p.name().clone())
                    .unwrap_or_else(|| UNBOUND_NAME.to_string()),
                mark: state.mark_of(slot),
                bound: player.is_some(),
            }
        };

        Self {
            game_id: state.id(),
            cells: *state.grid().cells(),
            seats: [seat(PlayerSlot::One), seat(PlayerSlot::Two)],
            to_move: state.current_slot(),
            status: state.status(),
            winner: state.winner_slot(),
            phase: state.phase(),
        }
    }
}

impl GameStateView {
    /// Returns the seat for `slot`.
    pub fn seat(&self, slot: PlayerSlot) -> &SeatView {
        match slot {
            PlayerSlot::One => &self.seats[0],
            PlayerSlot::Two => &self.seats[1],
        }
    }

    /// Whether the game has a winner or a full grid.
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }
}

/// Symbol for a cell.
pub fn cell_symbol(cell: Cell) -> String {
    match cell {
        Cell::Empty => EMPTY_SYMBOL.to_string(),
        Cell::Marked(mark) => mark.to_string(),
    }
}

/// Cell symbols laid out as the 3x3 keyboard, row by row.
pub fn board_rows(view: &GameStateView) -> [[String; 3]; 3] {
    std::array::from_fn(|row| std::array::from_fn(|col| cell_symbol(view.cells()[row * 3 + col])))
}

/// Three lines of cell symbols.
#[instrument(skip(view), fields(game_id = %view.game_id()))]
pub fn render_board(view: &GameStateView) -> String {
    board_rows(view)
        .map(|row| row.concat())
        .join("\n")
}

/// Two lines, one per seat, with a hand pointing at whoever moves next.
#[instrument(skip(view), fields(game_id = %view.game_id()))]
pub fn render_turn_message(view: &GameStateView) -> String {
    [PlayerSlot::One, PlayerSlot::Two]
        .map(|slot| {
            let seat = view.seat(slot);
            let hand = if view.to_move() == &slot { HAND } else { "" };
            seat_line(seat, hand)
        })
        .join("\n")
}

/// Two lines, one per seat, marking winner and loser or a draw.
#[instrument(skip(view), fields(game_id = %view.game_id()))]
pub fn render_end_message(view: &GameStateView) -> String {
    [PlayerSlot::One, PlayerSlot::Two]
        .map(|slot| {
            let face = match view.winner() {
                Some(winner) if *winner == slot => WINNER,
                Some(_) => LOSER,
                None => DRAW,
            };
            seat_line(view.seat(slot), face)
        })
        .join("\n")
}

/// End message for a finished game, turn message otherwise.
pub fn render_message(view: &GameStateView) -> String {
    if view.is_over() {
        render_end_message(view)
    } else {
        render_turn_message(view)
    }
}

fn seat_line(seat: &SeatView, suffix: &str) -> String {
    format!("{} {} {}", seat.mark(), seat.name(), suffix)
        .trim_end()
        .to_string()
}

/// Callback tokens for every button of a live board, row by row.
pub fn cell_tokens(game_id: GameId) -> [[String; 3]; 3] {
    std::array::from_fn(|row| {
        std::array::from_fn(|col| {
            CallbackData::Move {
                game_id,
                cell: row * 3 + col,
            }
            .to_string()
        })
    })
}

/// Callback tokens for an invitation board. Every button opens the same game.
pub fn invitation_tokens(first_player_is_mark1: bool) -> [[String; 3]; 3] {
    let token = CallbackData::NewGame {
        first_player_is_mark1,
    }
    .to_string();
    std::array::from_fn(|_| std::array::from_fn(|_| token.clone()))
}
