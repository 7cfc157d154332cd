//! Results of applying a move to a game.
//!
//! An accepted move is a domain event describing what changed. A rejected
//! move carries the reason and guarantees the game was left untouched.

use crate::{GameStatus, Mark, PlayerSlot, UserId};
use serde::{Deserialize, Serialize};

/// What an accepted move changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveAccepted {
    /// The acting user was bound to an empty seat. No mark was placed and
    /// the turn did not change.
    Joined(PlayerSlot),
    /// A mark was placed and the turn passed to the other seat.
    Placed {
        /// Seat that moved.
        slot: PlayerSlot,
        /// Cell index (0-8).
        cell: usize,
        /// Mark placed.
        mark: Mark,
    },
}

/// Why a move was rejected.
///
/// Rejections never mutate the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Rejection {
    /// Player 1 pressed a button before anyone joined.
    #[display("Cannot play against yourself")]
    SelfPlay,

    /// The user holds neither seat.
    #[display("User {} is not playing this game", _0)]
    NotAPlayer(UserId),

    /// The event carried no cell index.
    #[display("No cell was selected")]
    MissingCell,

    /// The cell index is outside 0-8.
    #[display("Cell {} is off the grid", _0)]
    CellOutOfRange(usize),

    /// The game already has a winner or a full grid.
    #[display("Game is already over")]
    GameOver,

    /// The user holds a seat but it is the other seat's turn.
    #[display("It's not {}'s turn", _0)]
    OutOfTurn(PlayerSlot),

    /// The cell already carries a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(usize),
}

impl std::error::Error for Rejection {}

/// Lifecycle phase of a game, derived from its stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nobody is bound yet.
    Created,
    /// Player 1 is waiting for an opponent.
    AwaitingPlayer2,
    /// Both seats bound, the given seat moves next.
    InProgress(PlayerSlot),
    /// The grid is won or full.
    Ended(GameStatus),
}
